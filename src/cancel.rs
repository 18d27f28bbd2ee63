// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stopping a render part way.  The work generator polls the token
//! once per batch of pixels; workers poll it before every sample and,
//! once it fires, drain the work queue without emitting anything.  A
//! cancelled render never returns a buffer, only a count of how far it
//! got.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::RenderError;

/// Pixels the work generator enqueues between polls.
pub const GENERATOR_POLL_BATCH: usize = 1024;

/// Anything a render can poll to learn that it should stop.
pub trait CancelToken: Send + Sync {
    /// True once the render should stop.
    fn is_cancelled(&self) -> bool;

    /// Turns a short write count into the right failure: `Cancelled`
    /// if this token fired, otherwise None and the caller decides.
    fn explain_shortfall(&self, written: usize, total: usize) -> Option<RenderError> {
        if written < total && self.is_cancelled() {
            Some(RenderError::Cancelled(written, total))
        } else {
            None
        }
    }
}

/// The token `render_field` uses.  It never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A one-shot switch shared by reference between the caller and the
/// render.  Once thrown it stays thrown.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// An unthrown switch.
    pub fn new() -> Self {
        CancelFlag(AtomicBool::new(false))
    }

    /// Throws the switch.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl CancelToken for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
