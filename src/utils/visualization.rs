//! Diagnostics overlay for a processed chart.
//!
//! Draws the working grayscale chart with each house's OCR region outlined and
//! its centroid marked, which makes it easy to see whether the fixed layout
//! fractions and the ROI size fit a given source image.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::debug;

use crate::core::{ChartError, ChartResult};
use crate::domain::HouseTopology;
use crate::pipeline::PipelineTrace;
use crate::processors::PixelRect;

const ROI_COLOR: Rgb<u8> = Rgb([0, 160, 255]);

const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Outline thickness in pixels.
const ROI_THICKNESS: u32 = 2;

fn to_rect(rect: PixelRect) -> Option<Rect> {
    if rect.is_empty() {
        return None;
    }
    let x = i32::try_from(rect.x).ok()?;
    let y = i32::try_from(rect.y).ok()?;
    Some(Rect::at(x, y).of_size(rect.width, rect.height))
}

/// Renders the traced chart with ROIs and centroids drawn on top.
pub fn draw_overlay(trace: &PipelineTrace) -> RgbImage {
    let mut img = DynamicImage::ImageLuma8(trace.chart_gray.clone()).to_rgb8();
    let (width, height) = img.dimensions();

    for (house, roi) in &trace.rois {
        // Shrink by one pixel per ring so thicker outlines stay inside the ROI.
        for inset in 0..ROI_THICKNESS {
            let ring = PixelRect::new(
                roi.x + inset,
                roi.y + inset,
                roi.width.saturating_sub(2 * inset),
                roi.height.saturating_sub(2 * inset),
            );
            if let Some(rect) = to_rect(ring) {
                draw_hollow_rect_mut(&mut img, rect, ROI_COLOR);
            }
        }
        debug!("overlay house {} roi {:?}", house, roi);
    }

    for (_, centroid) in HouseTopology::new(width, height).centroids() {
        if let (Ok(x), Ok(y)) = (i32::try_from(centroid.x), i32::try_from(centroid.y)) {
            draw_cross_mut(&mut img, CENTROID_COLOR, x, y);
        }
    }
    img
}

/// Renders the overlay and writes it to `path`. The format follows the file
/// extension. Encoding and write failures are reported as [`ChartError::Io`].
pub fn save_overlay(trace: &PipelineTrace, path: &Path) -> ChartResult<()> {
    draw_overlay(trace).save(path).map_err(|e| match e {
        image::ImageError::IoError(io) => ChartError::Io(io),
        other => ChartError::Io(std::io::Error::other(other)),
    })
}
