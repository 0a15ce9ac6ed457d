//! Plant-likeness screen.
//!
//! Decides whether an image plausibly shows plant material by measuring the
//! share of pixels that fall in a leaf-green band and in a brown/yellow band.
//! An image passes when either share exceeds its threshold.
//!
//! Images without colour channels are accepted unconditionally. This is the
//! long-standing behaviour of the screen and callers rely on it; it is not a
//! measurement. Palette files count as having no colour channels even though
//! they decode to RGB.

use std::borrow::Cow;

use image::{DynamicImage, GenericImageView, RgbImage};
use plant_core::{Error, PlantVerdict, Result, ScreenConfig, VerdictBasis};
use tracing::debug;

use crate::hsv::pixel_to_hsv;
use crate::loader::DecodedImage;

/// Colour-band plant screen
#[derive(Debug, Clone, Default)]
pub struct PlantScreen {
    config: ScreenConfig,
}

impl PlantScreen {
    /// Creates a screen with the given bands and thresholds
    pub fn new(config: ScreenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Returns `true` when the image plausibly shows plant material.
    pub fn classify(&self, image: &DynamicImage) -> Result<bool> {
        self.screen(image).map(|verdict| verdict.is_plant)
    }

    /// Screens a decoded image of any pixel format.
    pub fn screen(&self, image: &DynamicImage) -> Result<PlantVerdict> {
        let (width, height) = image.dimensions();
        ensure_non_empty(width, height)?;

        if !image.color().has_color() {
            debug!(width, height, color = ?image.color(), "no colour channels, accepting");
            return Ok(unmeasured(width, height));
        }

        let rgb = match image {
            DynamicImage::ImageRgb8(buffer) => Cow::Borrowed(buffer),
            other => Cow::Owned(other.to_rgb8()),
        };
        self.screen_rgb(&rgb)
    }

    /// Screens an image loaded from a file, honouring its stored pixel format.
    pub fn screen_decoded(&self, decoded: &DecodedImage) -> Result<PlantVerdict> {
        if decoded.indexed {
            let (width, height) = decoded.image.dimensions();
            ensure_non_empty(width, height)?;
            debug!(width, height, "palette source, accepting");
            return Ok(unmeasured(width, height));
        }
        self.screen(&decoded.image)
    }

    /// Screens a raw 8-bit RGB grid.
    pub fn screen_rgb(&self, image: &RgbImage) -> Result<PlantVerdict> {
        let (width, height) = image.dimensions();
        ensure_non_empty(width, height)?;

        let mut green = 0u64;
        let mut brown = 0u64;
        for pixel in image.pixels() {
            let hsv = pixel_to_hsv(pixel);
            if self.config.green.contains(hsv) {
                green += 1;
            }
            if self.config.brown.contains(hsv) {
                brown += 1;
            }
        }

        let total = u64::from(width) * u64::from(height);
        let green_ratio = green as f64 / total as f64;
        let brown_ratio = brown as f64 / total as f64;
        let is_plant = green_ratio > self.config.green_threshold
            || brown_ratio > self.config.brown_threshold;

        debug!(
            width,
            height,
            green_ratio,
            brown_ratio,
            is_plant,
            "screened image"
        );

        Ok(PlantVerdict {
            is_plant,
            basis: VerdictBasis::ColorBands,
            green_ratio,
            brown_ratio,
            width,
            height,
        })
    }
}

/// Screens with the default bands and thresholds.
pub fn is_plant_image(image: &DynamicImage) -> Result<bool> {
    PlantScreen::default().classify(image)
}

fn unmeasured(width: u32, height: u32) -> PlantVerdict {
    PlantVerdict {
        is_plant: true,
        basis: VerdictBasis::Grayscale,
        green_ratio: 0.0,
        brown_ratio: 0.0,
        width,
        height,
    }
}

fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "image must be at least 1x1, got {width}x{height}"
        )));
    }
    Ok(())
}
