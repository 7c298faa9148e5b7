//! Locate stage: crops the chart image to its frame.

use std::time::Instant;

use tracing::{debug, warn};

use super::types::{StageMetrics, StageResult};
use crate::core::config::LocatorConfig;
use crate::core::{ChartError, ChartResult, PipelineStage};
use crate::pipeline::ChartImage;
use crate::processors::{PixelRect, crop, ink_mask, locate_frame};

/// Finds the chart frame and crops both buffers to it. Falls back to the full
/// frame when no contour is large enough.
pub struct LocateStage<'a> {
    config: &'a LocatorConfig,
}

impl<'a> LocateStage<'a> {
    pub fn new(config: &'a LocatorConfig) -> Self {
        Self { config }
    }

    pub fn process(&self, image: &mut ChartImage) -> ChartResult<StageResult<Option<PixelRect>>> {
        let start = Instant::now();
        let (width, height) = (image.width(), image.height());
        if image.binary.dimensions() != (width, height) {
            return Err(ChartError::locate(
                "buffer check",
                format!(
                    "binary buffer is {:?} but grayscale is {}x{}",
                    image.binary.dimensions(),
                    width,
                    height
                ),
            ));
        }

        let (ink, _) = ink_mask(&image.binary);
        let frame = locate_frame(&ink, self.config.min_area_fraction);

        match frame {
            Some(rect) => {
                if rect.is_empty() || !rect.fits_within(width, height) {
                    return Err(ChartError::locate(
                        "frame crop",
                        format!("frame {:?} outside {}x{} image", rect, width, height),
                    ));
                }
                image.gray = crop(&image.gray, rect);
                image.binary = crop(&image.binary, rect);
                image.frame = Some(rect);
                debug!(
                    "cropped to chart frame {}x{} at ({}, {})",
                    rect.width, rect.height, rect.x, rect.y
                );
            }
            None => warn!(
                "no contour covers {:.0}% of the image, using the full frame",
                self.config.min_area_fraction * 100.0
            ),
        }

        let metrics = StageMetrics::new(PipelineStage::Locate, usize::from(frame.is_some()), 0)
            .finished(start)
            .with_info("cropped", frame.is_some().to_string())
            .with_info("size", format!("{}x{}", image.width(), image.height()));
        Ok(StageResult::new(frame, metrics))
    }
}
