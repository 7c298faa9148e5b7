//! Decode stage: turns a decoded image into a [`ChartImage`].

use std::time::Instant;

use image::DynamicImage;

use super::types::{StageMetrics, StageResult};
use crate::core::config::PreprocessConfig;
use crate::core::{ChartResult, PipelineStage};
use crate::pipeline::ChartImage;
use crate::processors::prepare;

/// Grayscale conversion, working-width scaling, denoise and binarization.
pub struct PreprocessStage<'a> {
    config: &'a PreprocessConfig,
}

impl<'a> PreprocessStage<'a> {
    pub fn new(config: &'a PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn process(&self, image: &DynamicImage) -> ChartResult<StageResult<ChartImage>> {
        let start = Instant::now();
        let prepared = prepare(image, self.config)?;
        let (width, height) = prepared.dimensions();

        let metrics = StageMetrics::new(PipelineStage::Decode, 1, 0)
            .finished(start)
            .with_info("source_size", format!("{}x{}", image.width(), image.height()))
            .with_info("working_size", format!("{}x{}", width, height));
        Ok(StageResult::new(ChartImage::new(prepared), metrics))
    }
}
