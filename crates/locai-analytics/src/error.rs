//! Custom error types for the analytics toolkit.
//!
//! This module provides the error hierarchy using `thiserror`. Every component
//! fails fast with one of these variants; the [`crate::Toolkit`] facade wraps
//! component failures with context while preserving the original cause.
//!
//! Errors are serializable so the calling layer can forward them as-is.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analytics toolkit.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Empty or malformed input collection, non-finite value, or zero cluster count.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not enough history for the requested forecast.
    #[error(
        "Insufficient data for forecasting: need at least {required} data points, got {actual}"
    )]
    InsufficientData { required: usize, actual: usize },

    /// Unexpected numeric failure inside an algorithm.
    #[error("Computation failed: {0}")]
    Computation(String),

    /// An option failed range validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalyticsError>,
    },
}

impl AnalyticsError {
    /// Shorthand for [`AnalyticsError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for [`AnalyticsError::Computation`].
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalyticsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for the calling layer.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::Computation(_) => "COMPUTATION_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Innermost error, skipping any context wrappers.
    pub fn root_cause(&self) -> &AnalyticsError {
        match self {
            Self::WithContext { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if the caller can recover by retrying with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::InvalidInput(_) | Self::InsufficientData { .. } | Self::InvalidConfig(_)
        )
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalyticsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalyticsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigValidationError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalyticsError::InvalidConfig(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalyticsError::invalid_input("empty").error_code(),
            "INVALID_INPUT"
        );
        assert_eq!(
            AnalyticsError::InsufficientData {
                required: 14,
                actual: 3
            }
            .error_code(),
            "INSUFFICIENT_DATA"
        );
        assert_eq!(
            AnalyticsError::computation("nan").error_code(),
            "COMPUTATION_ERROR"
        );
    }

    #[test]
    fn test_insufficient_data_names_minimum() {
        let error = AnalyticsError::InsufficientData {
            required: 14,
            actual: 5,
        };
        assert!(error.to_string().contains("at least 14"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AnalyticsError::invalid_input("x").is_recoverable());
        assert!(
            AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            }
            .is_recoverable()
        );
        assert!(!AnalyticsError::computation("x").is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalyticsError::invalid_input("no customer records");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_INPUT"));
        assert!(json.contains("no customer records"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalyticsError::invalid_input("empty").with_context("Anomaly detection failed");
        assert!(error.to_string().contains("Anomaly detection failed"));
        assert_eq!(error.error_code(), "INVALID_INPUT"); // Preserves original code
        assert!(error.is_recoverable());
        assert!(matches!(
            error.root_cause(),
            AnalyticsError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_config_error_context() {
        let result: std::result::Result<(), ConfigValidationError> =
            Err(ConfigValidationError::InvalidThreshold(0.0));
        let error = result.context("Validating options").unwrap_err();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
