// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failure types for configuring and running a render.

use failure::Fail;

/// A render configuration that cannot be honoured.  These are all
/// detected before any thread is spawned or any buffer allocated.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum ConfigError {
    /// The raster has no rows or no columns.
    #[fail(display = "the raster must be at least 1x1, got {}x{}", _0, _1)]
    EmptyRaster(usize, usize),

    /// The raster does not fit the 32-bit dimensions of the pixel store.
    #[fail(display = "the raster {}x{} is too large", _0, _1)]
    RasterTooLarge(usize, usize),

    /// The real axis of the plane window is empty, inverted, or not finite.
    #[fail(display = "the left edge {} is not to the left of the right edge {}", _0, _1)]
    BadRealAxis(f64, f64),

    /// The imaginary axis of the plane window is empty, inverted, or not finite.
    #[fail(display = "the lower edge {} is not below the upper edge {}", _0, _1)]
    BadImaginaryAxis(f64, f64),

    /// No iterations means no point could ever be classified.
    #[fail(display = "the iteration budget must be positive")]
    NoIterations,

    /// No workers means no point would ever be sampled.
    #[fail(display = "the worker count must be positive")]
    NoWorkers,

    /// More workers than one render may spawn.
    #[fail(display = "{} workers requested, at most {} allowed", _0, _1)]
    TooManyWorkers(usize, usize),

    /// The canvas handed to the render is not the configured raster size.
    #[fail(display = "the canvas is {}x{} but the raster is {}x{}", _0, _1, _2, _3)]
    CanvasMismatch(usize, usize, usize, usize),
}

/// Everything that can stop a render from producing a complete buffer.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// Rejected before the render started.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(#[cause] ConfigError),

    /// A worker died while sampling.
    #[fail(display = "worker fault: {}", _0)]
    WorkerFault(String),

    /// The compositor could not write a sample into the output buffer.
    #[fail(display = "compositor fault: {}", _0)]
    CompositorFault(String),

    /// The caller's cancellation signal fired before every cell was
    /// written.  Carries the cells written and the cells expected.
    #[fail(display = "render cancelled after {} of {} cells", _0, _1)]
    Cancelled(usize, usize),
}

impl From<ConfigError> for RenderError {
    fn from(err: ConfigError) -> Self {
        RenderError::Config(err)
    }
}
