//! Image loading for uploads and on-disk photos.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::error::ImageError;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};
use plant_core::{Error, Result, ServerConfig};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Bounds applied while decoding a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted width or height
    pub max_side: u32,
    /// Largest decoder allocation, and largest decoded pixel buffer
    pub max_bytes: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for DecodeLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_side: config.max_image_side,
            max_bytes: config.max_decode_bytes,
        }
    }
}

impl DecodeLimits {
    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_side);
        limits.max_image_height = Some(self.max_side);
        limits.max_alloc = Some(self.max_bytes);
        limits
    }
}

/// A decoded image plus what its file stored per pixel.
///
/// Palette files expand to RGB(A) on decode, so the pixel buffer alone cannot
/// tell them apart from true colour photos.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// The file stored palette indices rather than colour channels
    pub indexed: bool,
}

impl DecodedImage {
    /// Wraps an in-memory image; it has no source file, so it is never indexed
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            indexed: false,
        }
    }
}

/// Decodes an uploaded image, guessing the format from its contents.
pub fn decode_image(bytes: &[u8], limits: &DecodeLimits) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("empty image upload".to_string()));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::Image(format!("Failed to decode image: {e}")))?;
    let format = reader.format();
    reader.limits(limits.to_image_limits());

    let image = reader.decode().map_err(|e| match e {
        ImageError::Limits(e) => Error::InvalidInput(format!("Image exceeds decode limits: {e}")),
        e => Error::Image(format!("Failed to decode image: {e}")),
    })?;

    // not every decoder honours the allocation limit
    let decoded_bytes = image.as_bytes().len() as u64;
    if decoded_bytes > limits.max_bytes {
        return Err(Error::InvalidInput(format!(
            "Image exceeds decode limits: {decoded_bytes} bytes decoded, limit {}",
            limits.max_bytes
        )));
    }

    let indexed = format.is_some_and(|format| stores_palette(format, bytes));
    Ok(DecodedImage { image, indexed })
}

/// Loads an image from a path
pub fn open_image(path: &Path, limits: &DecodeLimits) -> Result<DecodedImage> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Image file not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    decode_image(&bytes, limits).map_err(|e| match e {
        Error::Image(msg) => Error::Image(format!("{} ({})", msg, path.display())),
        e => e,
    })
}

/// Whether the file header declares palette-indexed pixels.
///
/// GIF is always indexed. PNG colour type 3 and BMP with 8 or fewer bits per
/// pixel are indexed.
fn stores_palette(format: ImageFormat, bytes: &[u8]) -> bool {
    match format {
        ImageFormat::Gif => true,
        ImageFormat::Png => {
            let mut decoder = png::Decoder::new(Cursor::new(bytes));
            decoder
                .read_header_info()
                .is_ok_and(|info| info.color_type == png::ColorType::Indexed)
        }
        ImageFormat::Bmp => match (bytes.get(14..18), bytes.get(28..30)) {
            // BITMAPINFOHEADER or later; the 12-byte core header lays out differently
            (Some(header), Some(bits)) => {
                let header_size = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
                let bits_per_pixel = u16::from_le_bytes([bits[0], bits[1]]);
                header_size >= 40 && bits_per_pixel <= 8
            }
            _ => false,
        },
        _ => false,
    }
}

/// Checks whether a path has a known image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Expands a file or directory into the list of images to process.
///
/// A file is returned as-is whatever its extension; directories are walked
/// recursively and filtered by extension. The result is sorted.
pub fn collect_image_paths(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Path not found: {}",
            path.display()
        )));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| Error::Other(format!("Failed to walk {}: {e}", path.display())))?;
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            images.push(entry.into_path());
        }
    }

    images.sort();
    Ok(images)
}
