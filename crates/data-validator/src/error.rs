//! Validation Error Types

use thiserror::Error;

/// Errors during request validation
///
/// Every variant except `InvalidFormat` names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of the declared range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value inside the declared range but rejected by a realism rule
    #[error("{field} value {value} rejected: {message}")]
    RuleViolated {
        field: &'static str,
        value: f64,
        message: &'static str,
    },

    /// Fractional value for an integer field
    #[error("{field} value {value} is not a whole number")]
    NotAnInteger { field: &'static str, value: f64 },

    /// Categorical value outside the enumerated set
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    InvalidCategory {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// JSON type does not fit the field
    #[error("{field} must be a {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::RuleViolated { field, .. }
            | ValidationError::NotAnInteger { field, .. }
            | ValidationError::InvalidCategory { field, .. }
            | ValidationError::InvalidType { field, .. } => Some(*field),
            ValidationError::MissingField(field) => Some(*field),
            ValidationError::InvalidFormat(_) => None,
        }
    }

    /// Machine-readable name of the violated constraint
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { .. } => "value_error.number.range",
            ValidationError::RuleViolated { .. } => "value_error.rule",
            ValidationError::NotAnInteger { .. } => "type_error.integer",
            ValidationError::InvalidCategory { .. } => "value_error.enum",
            ValidationError::InvalidType { .. } => "type_error",
            ValidationError::InvalidFormat(_) => "type_error.object",
            ValidationError::MissingField(_) => "value_error.missing",
        }
    }
}
