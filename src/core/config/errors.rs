//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric parameter is outside its allowed range.
    #[error("{field} out of range: {message}")]
    OutOfRange { field: &'static str, message: String },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed {
        path: std::path::PathBuf,
        message: String,
    },
}

/// A trait for validating configuration parameters.
///
/// Implemented by every configuration section so that the reader can reject a
/// bad configuration before any image is touched.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a fraction lies in `(0, 1]`.
    fn validate_fraction(&self, field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !(value > 0.0 && value <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field,
                message: format!("expected a value in (0, 1], got {}", value),
            });
        }
        Ok(())
    }

    /// Validates that an integer is at least `min`.
    fn validate_at_least(
        &self,
        field: &'static str,
        value: u32,
        min: u32,
    ) -> Result<(), ConfigError> {
        if value < min {
            return Err(ConfigError::OutOfRange {
                field,
                message: format!("expected at least {}, got {}", min, value),
            });
        }
        Ok(())
    }

    /// Validates that a float is finite and at least `min`.
    fn validate_finite_at_least(
        &self,
        field: &'static str,
        value: f32,
        min: f32,
    ) -> Result<(), ConfigError> {
        if !value.is_finite() || value < min {
            return Err(ConfigError::OutOfRange {
                field,
                message: format!("expected a finite value >= {}, got {}", min, value),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl ConfigValidator for Probe {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Probe
        }
    }

    #[test]
    fn test_validate_fraction() {
        let probe = Probe;
        assert!(probe.validate_fraction("f", 0.25).is_ok());
        assert!(probe.validate_fraction("f", 1.0).is_ok());
        assert!(probe.validate_fraction("f", 0.0).is_err());
        assert!(probe.validate_fraction("f", 1.5).is_err());
        assert!(probe.validate_fraction("f", f32::NAN).is_err());
    }

    #[test]
    fn test_validate_at_least() {
        let probe = Probe;
        assert!(probe.validate_at_least("n", 10, 2).is_ok());
        let err = probe.validate_at_least("n", 1, 2).unwrap_err();
        assert_eq!(err.to_string(), "n out of range: expected at least 2, got 1");
    }

    #[test]
    fn test_validate_finite_at_least() {
        let probe = Probe;
        assert!(probe.validate_finite_at_least("s", 2.0, 1.0).is_ok());
        assert!(probe.validate_finite_at_least("s", 0.5, 1.0).is_err());
        assert!(probe.validate_finite_at_least("s", f32::INFINITY, 1.0).is_err());
    }
}
