//! Validation errors for request bodies.

use thiserror::Error;

/// Errors raised when a request body fails client-side validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required field is empty or missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field holds a value the service would reject.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl ModelError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
