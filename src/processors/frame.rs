//! Chart frame detection.
//!
//! Scans often carry a printed header ("Janma Kundali") or margin notes
//! around the chart. The chart frame is the largest external contour, and a
//! contour only counts if its bounding box covers a minimum share of the image.

use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use tracing::debug;

use super::region::PixelRect;

/// Axis-aligned bounding box of a contour, inclusive of its edge pixels.
pub fn contour_bounds(contour: &Contour<u32>) -> Option<PixelRect> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(PixelRect::from_corners(min_x, min_y, max_x + 1, max_y + 1))
}

/// Finds the bounding box of the chart frame in an ink mask (ink non-zero).
///
/// Only outer contours with no parent are considered. Among those whose box
/// area exceeds `min_area_fraction` of the image, the largest wins; the first
/// one found wins a tie. Returns `None` if no contour qualifies.
pub fn locate_frame(ink: &GrayImage, min_area_fraction: f32) -> Option<PixelRect> {
    let (width, height) = ink.dimensions();
    let min_area = u64::from(width) * u64::from(height);
    let min_area = min_area as f64 * f64::from(min_area_fraction);

    let contours = find_contours::<u32>(ink);
    let mut best: Option<PixelRect> = None;
    let mut external = 0usize;

    for contour in contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
    {
        external += 1;
        let Some(bounds) = contour_bounds(contour) else {
            continue;
        };
        let area = bounds.area();
        if (area as f64) <= min_area {
            continue;
        }
        if best.is_none_or(|b| area > b.area()) {
            best = Some(bounds);
        }
    }

    debug!(
        "frame search: {} contours, {} external, selected {:?}",
        contours.len(),
        external,
        best
    );
    best
}
