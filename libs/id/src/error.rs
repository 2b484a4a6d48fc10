//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("{kind} ID cannot be empty")]
    Empty { kind: &'static str },

    /// The ID is negative.
    #[error("{kind} ID must not be negative, got {value}")]
    Negative { kind: &'static str, value: i64 },

    /// The ID is not a decimal integer.
    #[error("invalid {kind} ID '{value}': expected a non-negative integer")]
    InvalidNumber { kind: &'static str, value: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty { .. })
    }

    /// The resource kind the failed ID was meant for.
    pub fn kind(&self) -> &'static str {
        match self {
            IdError::Empty { kind }
            | IdError::Negative { kind, .. }
            | IdError::InvalidNumber { kind, .. } => kind,
        }
    }
}
