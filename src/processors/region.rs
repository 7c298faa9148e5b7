//! Axis-aligned pixel regions and cropping.

use image::{GrayImage, imageops};
use serde::Serialize;

use crate::domain::PixelPoint;

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning the corners `(x1, y1)` inclusive to `(x2, y2)`
    /// exclusive.
    pub fn from_corners(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Square region of half-size `half` around `center`, clamped to an image
    /// of `width` x `height`.
    pub fn around(center: PixelPoint, half: u32, width: u32, height: u32) -> Self {
        let x1 = center.x.saturating_sub(half);
        let y1 = center.y.saturating_sub(half);
        let x2 = center.x.saturating_add(half).min(width);
        let y2 = center.y.saturating_add(half).min(height);
        Self::from_corners(x1.min(x2), y1.min(y2), x2, y2)
    }

    /// Whether the rectangle lies entirely inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Copies `rect` out of `image`. The rectangle is clipped to the image first.
pub fn crop(image: &GrayImage, rect: PixelRect) -> GrayImage {
    let (width, height) = image.dimensions();
    let x = rect.x.min(width);
    let y = rect.y.min(height);
    let w = rect.width.min(width - x);
    let h = rect.height.min(height - y);
    imageops::crop_imm(image, x, y, w, h).to_image()
}
