//! Image loading helpers.

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::core::{ChartError, ChartResult};

/// Converts a DynamicImage to an 8-bit GrayImage.
pub fn dynamic_to_gray(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path.
///
/// # Errors
///
/// Returns `ChartError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> ChartResult<DynamicImage> {
    image::open(path).map_err(ChartError::ImageLoad)
}

/// Decodes an encoded image (PNG, JPEG, ...) held in memory.
///
/// # Errors
///
/// Returns `ChartError::ImageLoad` if the format is not recognised or the
/// data is corrupt.
pub fn load_image_from_memory(bytes: &[u8]) -> ChartResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(ChartError::ImageLoad)
}
