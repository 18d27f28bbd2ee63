// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The five knobs of a render, bundled into one value and handed to
//! the pipeline explicitly.

use crate::errors::ConfigError;
use crate::planes::{PlaneMapper, PlaneWindow};

/// The most workers a single render will spawn.
pub const MAX_WORKERS: usize = 1024;

/// Everything a render needs to know.  Fixed before the first worker
/// starts and never changed during the pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The region of the complex plane being sampled.
    pub window: PlaneWindow,
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Per-point iteration cap.
    pub max_iterations: usize,
    /// Number of concurrent workers.
    pub workers: usize,
}

impl Default for RenderConfig {
    /// The classic full view of the set at 1750x2000, 60 iterations,
    /// 30 workers.
    fn default() -> Self {
        RenderConfig {
            window: PlaneWindow::new(-2.5, 1.0, -2.0, 2.0),
            width: 1750,
            height: 2000,
            max_iterations: 60,
            workers: 30,
        }
    }
}

impl RenderConfig {
    /// Builds a configuration from its parts without checking it.
    pub fn new(
        window: PlaneWindow,
        width: usize,
        height: usize,
        max_iterations: usize,
        workers: usize,
    ) -> Self {
        RenderConfig {
            window,
            width,
            height,
            max_iterations,
            workers,
        }
    }

    /// Checks every rule and, if they all hold, builds the mapper the
    /// workers will share.
    pub fn mapper(&self) -> Result<PlaneMapper, ConfigError> {
        let mapper = PlaneMapper::new(self.width, self.height, self.window)?;
        if self.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.workers > MAX_WORKERS {
            return Err(ConfigError::TooManyWorkers(self.workers, MAX_WORKERS));
        }
        Ok(mapper)
    }

    /// Returns the first rule this configuration breaks, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mapper().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mapper().unwrap().len(), 1750 * 2000);
    }

    #[test]
    fn rejects_each_bad_knob() {
        let good = RenderConfig::default();

        let config = RenderConfig { width: 0, ..good };
        assert_eq!(config.validate(), Err(ConfigError::EmptyRaster(0, 2000)));

        let config = RenderConfig { height: 0, ..good };
        assert_eq!(config.validate(), Err(ConfigError::EmptyRaster(1750, 0)));

        let config = RenderConfig {
            window: PlaneWindow::new(1.0, 1.0, -2.0, 2.0),
            ..good
        };
        assert_eq!(config.validate(), Err(ConfigError::BadRealAxis(1.0, 1.0)));

        let config = RenderConfig {
            window: PlaneWindow::new(-2.5, 1.0, 2.0, -2.0),
            ..good
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BadImaginaryAxis(2.0, -2.0))
        );

        let config = RenderConfig {
            max_iterations: 0,
            ..good
        };
        assert_eq!(config.validate(), Err(ConfigError::NoIterations));

        let config = RenderConfig { workers: 0, ..good };
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn rejects_absurd_worker_counts() {
        let good = RenderConfig::default();

        let config = RenderConfig {
            workers: MAX_WORKERS,
            ..good
        };
        assert!(config.validate().is_ok());

        let config = RenderConfig {
            workers: usize::MAX / 2,
            ..good
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyWorkers(usize::MAX / 2, MAX_WORKERS))
        );
    }
}
