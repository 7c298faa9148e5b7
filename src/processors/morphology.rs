//! Line-element morphology used to strip ruled grid lines from a chart.
//!
//! Opening a binary image with a `1 x k` (or `k x 1`) line element keeps
//! exactly the foreground pixels that lie on a horizontal (vertical) run of at
//! least `k` pixels, so it is computed here directly from run lengths.
//! Pixels outside the image count as background.

use image::{GrayImage, Luma, imageops};
use tracing::debug;

use super::binarize::{count_foreground, ink_mask};
use crate::core::{ChartError, ChartResult};

const ON: Luma<u8> = Luma([255]);

/// Opening with a horizontal line element of length `length`.
pub fn open_horizontal(ink: &GrayImage, length: u32) -> GrayImage {
    let (width, height) = ink.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        keep_long_runs(width, length, |x| ink.get_pixel(x, y)[0] > 0, |x| {
            out.put_pixel(x, y, ON)
        });
    }
    out
}

/// Opening with a vertical line element of length `length`.
pub fn open_vertical(ink: &GrayImage, length: u32) -> GrayImage {
    let (width, height) = ink.dimensions();
    let mut out = GrayImage::new(width, height);
    for x in 0..width {
        keep_long_runs(height, length, |y| ink.get_pixel(x, y)[0] > 0, |y| {
            out.put_pixel(x, y, ON)
        });
    }
    out
}

/// Calls `mark` for every index on a run of `is_on` of at least `length`.
fn keep_long_runs(
    extent: u32,
    length: u32,
    is_on: impl Fn(u32) -> bool,
    mut mark: impl FnMut(u32),
) {
    let mut start = 0;
    while start < extent {
        if !is_on(start) {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < extent && is_on(end) {
            end += 1;
        }
        if end - start >= length {
            (start..end).for_each(&mut mark);
        }
        start = end;
    }
}

/// Output of [`suppress_grid`].
#[derive(Debug, Clone)]
pub struct GridSuppression {
    /// The input with grid pixels turned to background, in the input's
    /// polarity.
    pub cleaned: GrayImage,
    /// Detected grid pixels (bright on black).
    pub grid_mask: GrayImage,
}

/// Removes ruled horizontal and vertical lines from a binary image.
///
/// Ink is taken to be the minority colour. Long runs are found on the ink
/// mask and subtracted from it, then the original polarity is restored.
pub fn suppress_grid(binary: &GrayImage, kernel_length: u32) -> ChartResult<GridSuppression> {
    if kernel_length < 2 {
        return Err(ChartError::suppress(
            "line element",
            format!("kernel length {} is shorter than two pixels", kernel_length),
        ));
    }

    let (ink, inverted) = ink_mask(binary);
    let horizontal = open_horizontal(&ink, kernel_length);
    let vertical = open_vertical(&ink, kernel_length);

    let grid_mask = GrayImage::from_fn(ink.width(), ink.height(), |x, y| {
        Luma([horizontal.get_pixel(x, y)[0].saturating_add(vertical.get_pixel(x, y)[0])])
    });
    let mut cleaned = GrayImage::from_fn(ink.width(), ink.height(), |x, y| {
        Luma([ink.get_pixel(x, y)[0].saturating_sub(grid_mask.get_pixel(x, y)[0])])
    });
    debug!(
        "grid suppression removed {} of {} ink pixels (kernel {})",
        count_foreground(&grid_mask),
        count_foreground(&ink),
        kernel_length
    );

    if inverted {
        imageops::invert(&mut cleaned);
    }
    Ok(GridSuppression { cleaned, grid_mask })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(ink_value: u8, page_value: u8) -> GrayImage {
        let mut img = GrayImage::from_pixel(60, 40, Luma([page_value]));
        // 30px horizontal rule, 2px thick.
        for x in 5..35 {
            img.put_pixel(x, 10, Luma([ink_value]));
            img.put_pixel(x, 11, Luma([ink_value]));
        }
        // 8px vertical glyph stroke.
        for y in 25..33 {
            img.put_pixel(45, y, Luma([ink_value]));
        }
        img
    }

    #[test]
    fn test_open_horizontal_keeps_only_long_runs() {
        let mut ink = GrayImage::new(40, 3);
        for x in 0..30 {
            ink.put_pixel(x, 0, ON);
        }
        for x in 0..8 {
            ink.put_pixel(x, 2, ON);
        }
        let opened = open_horizontal(&ink, 25);
        assert_eq!(count_foreground(&opened), 30);
        assert_eq!(opened.get_pixel(0, 0)[0], 255);
        assert_eq!(opened.get_pixel(29, 0)[0], 255);
        assert_eq!(opened.get_pixel(0, 2)[0], 0);
    }

    #[test]
    fn test_open_vertical_keeps_only_long_runs() {
        let mut ink = GrayImage::new(2, 40);
        for y in 3..33 {
            ink.put_pixel(0, y, ON);
        }
        for y in 0..24 {
            ink.put_pixel(1, y, ON);
        }
        let opened = open_vertical(&ink, 25);
        assert_eq!(count_foreground(&opened), 30);
        assert_eq!(opened.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn test_suppress_removes_line_and_keeps_glyph_on_dark_page() {
        let binary = canvas(255, 0);
        let result = suppress_grid(&binary, 25).unwrap();

        assert_eq!(result.cleaned.get_pixel(20, 10)[0], 0);
        assert_eq!(result.cleaned.get_pixel(20, 11)[0], 0);
        for y in 25..33 {
            assert_eq!(result.cleaned.get_pixel(45, y)[0], 255);
        }
        assert_eq!(count_foreground(&result.cleaned), 8);
        assert_eq!(count_foreground(&result.grid_mask), 60);
    }

    #[test]
    fn test_suppress_restores_light_page_polarity() {
        let binary = canvas(0, 255);
        let result = suppress_grid(&binary, 25).unwrap();

        // Line pixels become page colour, the glyph stays ink.
        assert_eq!(result.cleaned.get_pixel(5, 10)[0], 255);
        assert_eq!(result.cleaned.get_pixel(34, 11)[0], 255);
        assert_eq!(result.cleaned.get_pixel(45, 28)[0], 0);
        assert_eq!(result.cleaned.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_suppress_rejects_degenerate_kernel() {
        let err = suppress_grid(&canvas(255, 0), 1).unwrap_err();
        assert_eq!(err.stage(), Some(crate::core::PipelineStage::Suppress));
    }
}
