//! Stage processors of the chart pipeline.
//!
//! Each stage borrows its slice of the configuration, transforms the
//! per-call [`crate::pipeline::ChartImage`] or house cells, and returns a
//! [`StageResult`] carrying its output together with [`StageMetrics`].
//!
//! Stages run in a fixed order:
//!
//! 1. [`PreprocessStage`] - grayscale, scaling, denoise, OTSU
//! 2. [`LocateStage`] - crop to the chart frame
//! 3. [`SuppressStage`] - remove ruled grid lines
//! 4. [`ExtractionStage`] - multi-pass OCR of every house
//! 5. [`ValidationStage`] - ascendant resolution and checks

mod extraction;
mod locate;
mod preprocess;
mod suppress;
mod types;
mod validation;

pub use extraction::{
    ExtractionStage, ExtractionSummary, HouseExtraction, OCR_PASSES, merge_planets, roi_for,
    vote_sign,
};
pub use locate::LocateStage;
pub use preprocess::PreprocessStage;
pub use suppress::SuppressStage;
pub use types::{PipelineStageName, StageMetrics, StageResult};
pub use validation::{
    ChartValidator, ValidationOutcome, ValidationStage, ValidatorState, deduce_ascendant,
};
