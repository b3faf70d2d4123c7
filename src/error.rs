//! Error handling module
//!
//! Provides the unified error type shared by services, queries, mutations and
//! dialogs, plus the human-readable messages shown in toasts.

use crate::validation::FieldErrors;
use thiserror::Error;

/// Crate-wide error type
///
/// Cloneable so a single failed request can be delivered to every observer
/// that was waiting on the same cached query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Another submission is still pending")]
    Busy,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AdminError {
    /// True when the error comes from an aborted fetch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AdminError::Cancelled)
    }

    /// True for HTTP 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::Http { status: 404, .. })
    }

    /// Message suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            AdminError::Http { message, .. } if !message.is_empty() => message.clone(),
            AdminError::Http { status, .. } => match status {
                400 => "The request was invalid.".to_string(),
                401 => "Your session has expired. Please sign in again.".to_string(),
                403 => "You do not have permission to perform this action.".to_string(),
                404 => "The requested item was not found.".to_string(),
                409 => "This item conflicts with an existing one.".to_string(),
                413 => "The uploaded file is too large.".to_string(),
                s if *s >= 500 => "The server encountered an error.".to_string(),
                s => format!("Request failed with status {}", s),
            },
            AdminError::Rejected(message) => message.clone(),
            AdminError::Decode(_) => "The server returned an unexpected response.".to_string(),
            AdminError::Validation(errors) => errors
                .first_message()
                .unwrap_or_else(|| "Please fix the highlighted fields.".to_string()),
            AdminError::Cancelled => "The request was cancelled.".to_string(),
            AdminError::Busy => "Please wait for the current submission to finish.".to_string(),
            AdminError::Unsupported(msg)
            | AdminError::Unauthorized(msg)
            | AdminError::Config(msg)
            | AdminError::Io(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdminError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AdminError::Http {
                status: status.as_u16(),
                message: String::new(),
            }
        } else {
            AdminError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Io(err.to_string())
    }
}

impl From<dialoguer::Error> for AdminError {
    fn from(err: dialoguer::Error) -> Self {
        AdminError::Io(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AdminError::Validation(FieldErrors::from(&errors))
    }
}

/// Result type alias used across the crate
pub type AdminResult<T> = Result<T, AdminError>;

/// Helper function to create an unsupported-operation error
pub fn unsupported(msg: impl Into<String>) -> AdminError {
    AdminError::Unsupported(msg.into())
}

/// Helper function to create a configuration error
pub fn config_error(msg: impl Into<String>) -> AdminError {
    AdminError::Config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_message_prefers_server_text() {
        let err = AdminError::Http {
            status: 422,
            message: "Title already taken".to_string(),
        };
        assert_eq!(err.user_message(), "Title already taken");
    }

    #[test]
    fn test_http_message_falls_back_to_status() {
        let err = AdminError::Http {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "The requested item was not found.");

        let err = AdminError::Http {
            status: 503,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "The server encountered an error.");
    }

    #[test]
    fn test_cancelled_is_detected() {
        assert!(AdminError::Cancelled.is_cancelled());
        assert!(!AdminError::Busy.is_cancelled());
    }
}
