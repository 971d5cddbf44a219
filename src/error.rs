//! Error types for the insurance charges service
//!
//! Every stage of the request pipeline has its own error type so the API layer
//! can tell client mistakes apart from internal failures. [`ChargesError`] wraps
//! them all for callers that only need a single error type.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::preprocessing::CategoricalField;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ChargesError>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum ChargesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Startup(#[from] StartupError),
}

/// A single offending request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Request failed structural or domain checks.
///
/// Holds every violation found, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Error for a body that could not be read as a JSON object at all
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new("body", message)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// True if any violation concerns `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Value was not part of the field's vocabulary.
///
/// Validation rejects such values first, so seeing this means the validator and
/// the encoder disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value {value:?} is not in the {field} vocabulary")]
pub struct EncodingError {
    pub field: CategoricalField,
    pub value: String,
}

/// Model computation failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Invalid shape: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model produced {0} outputs for a single row")]
    OutputCount(usize),

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),

    #[error("Prediction worker failed: {0}")]
    Worker(String),
}

/// An artifact could not be loaded; the process must not serve
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
}

impl StartupError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        StartupError::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_joins_fields() {
        let err = ValidationError::new(vec![
            FieldViolation::new("age", "must be greater than 0"),
            FieldViolation::new("bmi", "field required"),
        ]);
        assert_eq!(
            err.to_string(),
            "age: must be greater than 0; bmi: field required"
        );
        assert!(err.mentions("bmi"));
        assert!(!err.mentions("sex"));
    }

    #[test]
    fn test_error_from_inference() {
        let err: ChargesError = InferenceError::NonFinite(f64::NAN).into();
        assert!(matches!(err, ChargesError::Inference(_)));
    }

    #[test]
    fn test_encoding_error_display() {
        let err = EncodingError {
            field: CategoricalField::Region,
            value: "north".to_string(),
        };
        assert_eq!(err.to_string(), "value \"north\" is not in the region vocabulary");
    }
}
