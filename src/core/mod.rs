//! The core module of the chart reader.
//!
//! This module contains the pieces every other module leans on:
//! - Error handling ([`ChartError`], [`PipelineStage`])
//! - Configuration management and validation
//!
//! It also re-exports the logging setup helper for convenience.

pub mod config;
pub mod errors;

pub use crate::utils::init_tracing;
pub use config::{ChartReaderConfig, ConfigError, ConfigValidator};
pub use errors::{ChartError, ChartResult, PipelineStage, SimpleError};
