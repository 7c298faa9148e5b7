//! Suppress stage: strips ruled grid lines from the binary image.

use std::time::Instant;

use super::types::{StageMetrics, StageResult};
use crate::core::config::GridConfig;
use crate::core::{ChartError, ChartResult, PipelineStage};
use crate::pipeline::ChartImage;
use crate::processors::binarize::count_foreground;
use crate::processors::suppress_grid;

pub struct SuppressStage<'a> {
    config: &'a GridConfig,
}

impl<'a> SuppressStage<'a> {
    pub fn new(config: &'a GridConfig) -> Self {
        Self { config }
    }

    /// Fills `image.cleaned` and returns the number of grid pixels removed.
    pub fn process(&self, image: &mut ChartImage) -> ChartResult<StageResult<usize>> {
        let start = Instant::now();
        let suppression = suppress_grid(&image.binary, self.config.kernel_length)?;
        if suppression.cleaned.dimensions() != image.gray.dimensions() {
            return Err(ChartError::suppress(
                "mask subtraction",
                "cleaned buffer does not match the grayscale buffer",
            ));
        }

        let removed = count_foreground(&suppression.grid_mask);
        image.cleaned = Some(suppression.cleaned);

        let metrics = StageMetrics::new(PipelineStage::Suppress, 1, 0)
            .finished(start)
            .with_info("kernel_length", self.config.kernel_length.to_string())
            .with_info("grid_pixels", removed.to_string());
        Ok(StageResult::new(removed, metrics))
    }
}
