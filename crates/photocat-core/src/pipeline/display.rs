//! Fitting materialized photos to the display bounds.

use image::{DynamicImage, GenericImageView};

use crate::config::DisplayConfig;

/// Downscales images to fit within the configured display bounds.
pub struct DisplayFitter {
    config: DisplayConfig,
}

impl DisplayFitter {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    /// Fit `image` inside the bounds, preserving aspect ratio.
    ///
    /// Images already within bounds are returned untouched; nothing is
    /// upscaled.
    pub fn fit(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        if width <= self.config.max_width && height <= self.config.max_height {
            return image;
        }
        image.thumbnail(self.config.max_width, self.config.max_height)
    }

    /// Configured bounds as `(max_width, max_height)`.
    pub fn bounds(&self) -> (u32, u32) {
        (self.config.max_width, self.config.max_height)
    }
}
