#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time field renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of `z -> z * z + c`, starting at zero, stays
//! bounded.  We sample a rectangular window of the plane on a pixel
//! grid, iterate each sample up to a fixed budget, and colour it
//! black if it never escaped or by how late and how far it escaped
//! otherwise.
//!
//! Every sample is independent, so the work is fanned out over a
//! fixed pool of threads and fanned back in to a single compositor
//! that owns the output buffer.  See `pipeline` for the details of
//! how that is put together and torn down.

pub mod cancel;
pub mod canvas;
pub mod colour;
pub mod config;
pub mod errors;
pub mod escape;
pub mod pipeline;
pub mod planes;

pub use cancel::{CancelFlag, CancelToken, NeverCancel};
pub use canvas::{Canvas, OutputBuffer};
pub use config::RenderConfig;
pub use errors::{ConfigError, RenderError};
pub use pipeline::{render_field, render_field_with_cancel, render_into, RenderSummary};
pub use planes::{Pixel, PlaneMapper, PlaneWindow};
