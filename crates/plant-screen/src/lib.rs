//! Plant-likeness screening for leaf photos.
//!
//! A cheap colour heuristic that rejects uploads which are obviously not
//! plants before anything more expensive looks at them.
//!
//! ```rust,ignore
//! use plant_screen::{decode_image, DecodeLimits, PlantScreen};
//!
//! let decoded = decode_image(&bytes, &DecodeLimits::default())?;
//! let verdict = PlantScreen::default().screen_decoded(&decoded)?;
//! println!("plant: {} (green {:.2})", verdict.is_plant, verdict.green_ratio);
//! ```

pub mod classifier;
pub mod hsv;
pub mod loader;

pub use classifier::{is_plant_image, PlantScreen};
pub use hsv::{pixel_to_hsv, rgb_to_hsv};
pub use loader::{
    collect_image_paths, decode_image, is_image_path, open_image, DecodeLimits, DecodedImage,
};
