//! Configuration types for the chart reader.

pub mod errors;
pub mod reader;

pub use errors::{ConfigError, ConfigValidator};
pub use reader::{
    ChartReaderConfig, ExtractionConfig, GridConfig, LocatorConfig, PreprocessConfig,
    RecognitionConfig, TesseractConfig,
};
