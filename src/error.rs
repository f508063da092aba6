// SPDX-License-Identifier: MIT

//! Typed error handling for criteria-rs
//!
//! Validation failures surface while a query is being built, so the query
//! author sees them as parse errors. Evaluation never fails; compilation
//! fails only when the store schema cannot resolve a referenced field.

use thiserror::Error;

use crate::model::Field;

/// Top-level error type for criteria-rs
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// Operand or operator rejected while constructing a criteria node
    #[error("Invalid criteria: {0}")]
    Validation(#[from] ValidationError),

    /// Query text could not be tokenized or parsed
    #[error("Syntax error at offset {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Field name in query text or configuration is not known
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The store schema has no column for a field referenced by a query
    #[error("Field '{0}' is not mapped to a store column")]
    UnresolvedField(Field),

    /// Configuration errors (bad saved query, bad column mapping)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Construction-time validation errors for criteria nodes
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Operand was empty where a value is required
    #[error("Value for '{field}' must not be empty")]
    EmptyOperand { field: String },

    /// Operator cannot be applied to the field
    #[error("Operator '{operator}' is not supported for '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    /// Operand could not be interpreted for the field
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidOperand {
        field: String,
        value: String,
        reason: String,
    },
}

impl CriteriaError {
    /// Create a syntax error
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl ValidationError {
    /// Create an empty operand error
    pub fn empty(field: Field) -> Self {
        Self::EmptyOperand {
            field: field.to_string(),
        }
    }

    /// Create an invalid operand error
    pub fn invalid(field: Field, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOperand {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CriteriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_to_criteria_error() {
        let err: CriteriaError = ValidationError::empty(Field::Version).into();
        assert!(matches!(err, CriteriaError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid criteria: Value for 'Version' must not be empty"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = CriteriaError::syntax(7, "expected operator");
        assert_eq!(err.to_string(), "Syntax error at offset 7: expected operator");
    }

    #[test]
    fn test_unresolved_field_display() {
        let err = CriteriaError::UnresolvedField(Field::SubmitDate);
        assert_eq!(
            err.to_string(),
            "Field 'Submit Date' is not mapped to a store column"
        );
    }
}
