// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished samples land.  The compositor is the only writer,
//! and it writes through the `Canvas` trait so that the pipeline does
//! not care what sits on the other end.

use image::{Rgba, RgbaImage};

use crate::errors::{ConfigError, RenderError};
use crate::planes::Pixel;

/// A rectangular raster that accepts one colour per pixel.
pub trait Canvas {
    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Stores `colour` at `pixel`.  Positions outside the raster are a
    /// compositor fault.
    fn put(&mut self, pixel: Pixel, colour: Rgba<u8>) -> Result<(), RenderError>;
}

/// Builds the fault reported for a write that misses the raster.
pub fn out_of_range(pixel: Pixel, width: usize, height: usize) -> RenderError {
    RenderError::CompositorFault(format!(
        "pixel ({}, {}) lies outside the {}x{} buffer",
        pixel.0, pixel.1, width, height
    ))
}

/// The finished field: an RGBA image, one pixel per sample.  Row 0 is
/// the lowest imaginary value of the plane window.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer {
    image: RgbaImage,
}

impl OutputBuffer {
    /// A transparent buffer.  Both dimensions must be non-zero and fit
    /// in 32 bits.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyRaster(width, height));
        }
        if width > u32::MAX as usize || height > u32::MAX as usize {
            return Err(ConfigError::RasterTooLarge(width, height));
        }
        Ok(OutputBuffer {
            image: RgbaImage::new(width as u32, height as u32),
        })
    }

    /// The colour at `pixel`, if it lies within the buffer.
    pub fn get(&self, pixel: Pixel) -> Option<Rgba<u8>> {
        if pixel.0 >= self.width() || pixel.1 >= self.height() {
            return None;
        }
        Some(*self.image.get_pixel(pixel.0 as u32, pixel.1 as u32))
    }

    /// The raw RGBA bytes, row by row.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Hands the underlying image to a display or encoding layer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for OutputBuffer {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn put(&mut self, pixel: Pixel, colour: Rgba<u8>) -> Result<(), RenderError> {
        if pixel.0 >= self.width() || pixel.1 >= self.height() {
            return Err(out_of_range(pixel, self.width(), self.height()));
        }
        self.image.put_pixel(pixel.0 as u32, pixel.1 as u32, colour);
        Ok(())
    }
}
