//! The chart reading pipeline.
//!
//! [`ChartReader`] drives the stages in [`stages`] over one image and turns
//! the filled house cells into an [`crate::domain::AnalysisResult`].

mod chart_image;
mod reader;
pub mod result;
pub mod stages;

#[cfg(test)]
mod reader_tests;

pub use chart_image::ChartImage;
pub use reader::{ChartReader, ChartReaderBuilder, PipelineTrace};
pub use stages::{StageMetrics, StageResult};
