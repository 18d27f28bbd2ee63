// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a window on the complex plane bounded by four real edges.
use itertools::iproduct;
use num::Complex;

use crate::errors::ConfigError;

/// Describes the x, y of a sample in the output raster.  Column
/// first, then row; both start at zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// The four real bounds of the region of the complex plane being
/// sampled.  The real part runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    /// Leftmost real value.
    pub x_min: f64,
    /// Rightmost real value.
    pub x_max: f64,
    /// Lowest imaginary value.
    pub y_min: f64,
    /// Highest imaginary value.
    pub y_max: f64,
}

impl PlaneWindow {
    /// Builds a window from its four edges.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        PlaneWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Builds a window from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Self {
        PlaneWindow::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// The left-lower corner, which is where pixel 0,0 lands.
    pub fn leftlower(&self) -> Complex<f64> {
        Complex::new(self.x_min, self.y_min)
    }

    /// The right-upper corner.
    pub fn rightupper(&self) -> Complex<f64> {
        Complex::new(self.x_max, self.y_max)
    }

    /// Both axes must be finite and strictly increasing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written so that NaN edges fail the comparison too.
        if !(self.x_min < self.x_max) || !(self.x_max - self.x_min).is_finite() {
            return Err(ConfigError::BadRealAxis(self.x_min, self.x_max));
        }
        if !(self.y_min < self.y_max) || !(self.y_max - self.y_min).is_finite() {
            return Err(ConfigError::BadImaginaryAxis(self.y_min, self.y_max));
        }
        Ok(())
    }
}

/// Maps the integral raster onto the plane window and back.  Once
/// built it is read-only, and is shared by reference with every
/// worker for the whole render.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    window: PlaneWindow,
    // The distance on the complex plane between two neighbouring
    // pixels, along x and along y.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Takes the raster size and the window it covers.  Fails if the
    /// raster is empty or the window is degenerate.
    pub fn new(width: usize, height: usize, window: PlaneWindow) -> Result<PlaneMapper, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyRaster(width, height));
        }
        if width > u32::MAX as usize || height > u32::MAX as usize {
            return Err(ConfigError::RasterTooLarge(width, height));
        }
        window.validate()?;

        let steps = (
            (window.x_max - window.x_min) / (width as f64),
            (window.y_max - window.y_min) / (height as f64),
        );

        Ok(PlaneMapper {
            width,
            height,
            window,
            steps,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The window this mapper was built for.
    pub fn window(&self) -> PlaneWindow {
        self.window
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// A mapper can't be built over an empty raster, but clippy asks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every pixel in `[0, width) x [0, height)`, each exactly once.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(0..self.width, 0..self.height).map(|(x, y)| Pixel(x, y))
    }

    /// Given a pixel on the integral plane, return the point on the
    /// complex plane at its left-lower corner.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.window.x_min + (pixel.0 as f64) * self.steps.0,
            self.window.y_min + (pixel.1 as f64) * self.steps.1,
        )
    }

    /// Given a point on the complex plane, return the pixel whose cell
    /// contains it, or None if it lies outside the window.
    pub fn point_to_pixel(&self, point: Complex<f64>) -> Option<Pixel> {
        let left = ((point.re - self.window.x_min) / self.steps.0).floor();
        let top = ((point.im - self.window.y_min) / self.steps.1).floor();
        if left < 0.0 || top < 0.0 || left >= self.width as f64 || top >= self.height as f64 {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }
}
