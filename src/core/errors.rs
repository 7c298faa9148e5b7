//! Error types for the chart-reading pipeline.
//!
//! Every fallible stage returns [`ChartError`]. Processing failures carry the
//! [`PipelineStage`] they happened in, so a caller can tell a cropping problem
//! from a grid-suppression problem without parsing messages.

use thiserror::Error;

/// Stage of the chart pipeline an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Image decoding, grayscale conversion, scaling and binarization.
    Decode,
    /// Chart frame detection and cropping.
    Locate,
    /// Grid-line suppression.
    Suppress,
    /// Per-house region extraction and OCR consensus.
    Extract,
    /// Ascendant validation and deduction.
    Validate,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Decode => write!(f, "decode"),
            PipelineStage::Locate => write!(f, "locate"),
            PipelineStage::Suppress => write!(f, "suppress"),
            PipelineStage::Extract => write!(f, "extract"),
            PipelineStage::Validate => write!(f, "validate"),
        }
    }
}

/// A plain message error, used as the `source` of processing errors raised by
/// the crate itself rather than by a dependency.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while reading a chart.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The image could not be decoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// A pipeline stage failed.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage where the error occurred.
        stage: PipelineStage,
        /// Additional context about the error.
        context: String,
        /// The underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The text recognition engine failed.
    #[error("recognition engine '{engine}': {message}")]
    Recognition {
        /// Name of the engine that failed.
        engine: String,
        /// What went wrong.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Creates a processing error for the given stage.
    pub fn processing(
        stage: PipelineStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a decode-stage error from a plain message.
    pub fn decode(context: &str, message: impl Into<String>) -> Self {
        Self::processing(PipelineStage::Decode, context, SimpleError::new(message))
    }

    /// Creates a locate-stage error from a plain message.
    pub fn locate(context: &str, message: impl Into<String>) -> Self {
        Self::processing(PipelineStage::Locate, context, SimpleError::new(message))
    }

    /// Creates a suppress-stage error from a plain message.
    pub fn suppress(context: &str, message: impl Into<String>) -> Self {
        Self::processing(PipelineStage::Suppress, context, SimpleError::new(message))
    }

    /// Creates an extract-stage error from a plain message.
    pub fn extract(context: &str, message: impl Into<String>) -> Self {
        Self::processing(PipelineStage::Extract, context, SimpleError::new(message))
    }

    /// Creates a validate-stage error from a plain message.
    pub fn validate(context: &str, message: impl Into<String>) -> Self {
        Self::processing(PipelineStage::Validate, context, SimpleError::new(message))
    }

    /// Creates a recognition engine error.
    pub fn recognition(engine: &str, message: impl Into<String>) -> Self {
        Self::Recognition {
            engine: engine.to_string(),
            message: message.into(),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Returns the pipeline stage for processing errors.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Processing { stage, .. } => Some(*stage),
            Self::ImageLoad(_) => Some(PipelineStage::Decode),
            _ => None,
        }
    }
}

impl From<image::ImageError> for ChartError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for ChartError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Convenient result alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_error_carries_stage() {
        let err = ChartError::suppress("mask subtraction", "dimension mismatch");
        assert_eq!(err.stage(), Some(PipelineStage::Suppress));
        assert_eq!(err.to_string(), "suppress failed: mask subtraction");

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("dimension mismatch"));
    }

    #[test]
    fn test_non_stage_errors() {
        assert_eq!(ChartError::config_error("bad").stage(), None);
        assert_eq!(
            ChartError::recognition("tesseract", "not installed").to_string(),
            "recognition engine 'tesseract': not installed"
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Decode.to_string(), "decode");
        assert_eq!(PipelineStage::Locate.to_string(), "locate");
        assert_eq!(PipelineStage::Extract.to_string(), "extract");
        assert_eq!(PipelineStage::Validate.to_string(), "validate");
    }
}
