//! Unified image loading for the supported photo formats
//!
//! This module provides a single entry point for loading images and a cheap
//! header probe used by the scanner to reject corrupt files.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, GIF (first frame), WebP, TIFF, BMP.
//!
//! ## Design
//!
//! The loader converts every image to an 8-bit RGB raster. Alpha channels
//! are dropped and grayscale is expanded to three equal channels, so the
//! feature extractor never special-cases color models.

use crate::error::{ClassifierError, Result};
use image::{ImageReader, RgbImage};
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Matching decoder format of the `image` crate
    pub fn as_image_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Load an image from disk and convert it to an RGB raster
///
/// # Errors
///
/// Returns `ClassifierError::ImageLoadError` if:
/// - The extension is not a supported format
/// - File cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use tone_sort::image_loader::load_image;
/// use std::path::Path;
///
/// let rgb = load_image(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", rgb.width(), rgb.height());
/// # Ok::<(), tone_sort::ClassifierError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| ClassifierError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        ClassifierError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.as_image_format());

    let img = reader.decode().map_err(|e| {
        ClassifierError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    Ok(img.to_rgb8())
}

/// Read only the header of an image and return its dimensions
///
/// The format is guessed from the file content, so a JPEG saved with a
/// `.png` extension still validates.
pub fn probe_image(path: &Path) -> Result<(u32, u32)> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| {
            ClassifierError::image_load(format!("Failed to open image file: {}", path.display()), e)
        })?;

    reader.into_dimensions().map_err(|e| {
        ClassifierError::image_load(format!("Invalid image header: {}", path.display()), e)
    })
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
