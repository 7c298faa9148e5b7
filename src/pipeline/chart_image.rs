//! The raster a single analysis works on.

use image::GrayImage;

use crate::processors::{PixelRect, PreparedImage};

/// Grayscale, binary and grid-suppressed buffers of one chart.
///
/// Owned by one analysis call. The locator crops `gray` and `binary` in place;
/// the suppressor fills in `cleaned`. All three always share dimensions.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub gray: GrayImage,
    pub binary: GrayImage,
    pub cleaned: Option<GrayImage>,
    /// Crop applied by the locator, in working-resolution coordinates.
    pub frame: Option<PixelRect>,
}

impl ChartImage {
    pub fn new(prepared: PreparedImage) -> Self {
        Self {
            gray: prepared.gray,
            binary: prepared.binary,
            cleaned: None,
            frame: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// The buffer the first OCR pass reads: grid-suppressed if available,
    /// otherwise the plain binary image.
    pub fn ocr_binary(&self) -> &GrayImage {
        self.cleaned.as_ref().unwrap_or(&self.binary)
    }
}
