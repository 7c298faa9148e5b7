//! Grayscale conversion, working-resolution scaling and OTSU binarization.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

use crate::core::config::PreprocessConfig;
use crate::core::{ChartError, ChartResult};

/// Grayscale and binary buffers of the same dimensions.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub gray: GrayImage,
    pub binary: GrayImage,
}

impl PreparedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.gray.dimensions()
    }
}

/// Converts a decoded image into the grayscale and binary buffers the rest of
/// the pipeline works on.
///
/// Narrow images are upscaled with cubic interpolation so that the per-house
/// regions hold enough pixels for OCR. The binary buffer is the blurred
/// grayscale thresholded at its OTSU level.
pub fn prepare(image: &DynamicImage, config: &PreprocessConfig) -> ChartResult<PreparedImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ChartError::decode(
            "grayscale conversion",
            format!("image has no pixels ({}x{})", width, height),
        ));
    }

    let gray = scale_to_working_width(image.to_luma8(), config);
    let blurred = if config.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, config.blur_sigma)
    } else {
        gray.clone()
    };
    let (binary, level) = otsu_binarize(&blurred);
    debug!(
        "prepared {}x{} -> {}x{} (otsu level {})",
        width,
        height,
        gray.width(),
        gray.height(),
        level
    );

    Ok(PreparedImage { gray, binary })
}

/// Scales `gray` isotropically so its width lies within the configured bounds.
pub fn scale_to_working_width(gray: GrayImage, config: &PreprocessConfig) -> GrayImage {
    let width = gray.width();
    let target = if width < config.min_width {
        config.min_width
    } else if let Some(max_width) = config.max_width.filter(|&max| width > max) {
        max_width
    } else {
        return gray;
    };
    let scale = target as f64 / width as f64;
    let new_height = ((gray.height() as f64 * scale).round() as u32).max(1);
    imageops::resize(&gray, target, new_height, FilterType::CatmullRom)
}

/// Upscales `gray` by `factor` with cubic interpolation.
pub fn upscale(gray: &GrayImage, factor: f32) -> GrayImage {
    let new_width = ((gray.width() as f32 * factor).round() as u32).max(1);
    let new_height = ((gray.height() as f32 * factor).round() as u32).max(1);
    imageops::resize(gray, new_width, new_height, FilterType::CatmullRom)
}

/// Thresholds `gray` at its OTSU level. Pixels above the level become 255.
pub fn otsu_binarize(gray: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(gray);
    let binary = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    (binary, level)
}

/// Number of non-zero pixels.
pub fn count_foreground(binary: &GrayImage) -> usize {
    binary.pixels().filter(|p| p[0] > 0).count()
}

/// Whether white is the majority colour, i.e. ink is dark on a light page.
pub fn is_dark_on_light(binary: &GrayImage) -> bool {
    let white = count_foreground(binary);
    let black = binary.len() - white;
    white > black
}

/// Returns the binary image with ink as the bright (non-zero) colour, plus
/// whether it had to be inverted to get there.
pub fn ink_mask(binary: &GrayImage) -> (GrayImage, bool) {
    if is_dark_on_light(binary) {
        let mut inverted = binary.clone();
        imageops::invert(&mut inverted);
        (inverted, true)
    } else {
        (binary.clone(), false)
    }
}
