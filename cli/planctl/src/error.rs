//! Error handling and display for the planner client.

use colored::Colorize;
use planner_id::IdError;
use planner_model::ModelError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the client, reconciler and commands.
///
/// Every variant renders as a message fit to show the user; none of them
/// leave the session unusable.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("{message}: {source}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered 2xx but the body was not what we expected.
    #[error("{message}: {detail}")]
    InvalidResponse { message: String, detail: String },

    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// Resource not found locally or remotely.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local preference storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl PlannerError {
    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a network error carrying the operation's default message.
    pub fn network(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            message: message.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status, when the error came from a service response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message shown inline to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message, .. } | Self::InvalidResponse { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<ModelError> for PlannerError {
    fn from(err: ModelError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<IdError> for PlannerError {
    fn from(err: IdError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(planner_err) = err.downcast_ref::<PlannerError>() {
        match planner_err {
            PlannerError::Network { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and the --api-url setting.".yellow()
                );
            }
            PlannerError::Api { status, .. } if *status == 404 => {
                eprintln!(
                    "\n{}",
                    "Hint: The resource may have been deleted. Run `plan board` to refresh."
                        .yellow()
                );
            }
            PlannerError::Validation(_) => {
                eprintln!("\n{}", "Hint: Run with --help to see required arguments.".yellow());
            }
            _ => {}
        }
    }
}
