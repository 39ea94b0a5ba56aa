//! Shared utilities.

use std::path::Path;

use crate::core::{OcrError, OcrResult};
use image::RgbImage;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Loads an image file as RGB, validating its extension first.
///
/// # Errors
///
/// Returns an invalid-input error for a missing or unsupported extension,
/// and an image-load error when decoding fails.
pub fn load_image(path: &Path) -> OcrResult<RgbImage> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(OcrError::invalid_input(format!(
            "unsupported image extension: {}",
            path.display()
        )));
    }

    let img = image::open(path).map_err(OcrError::ImageLoad)?;
    Ok(img.to_rgb8())
}
