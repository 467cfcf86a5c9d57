//! Error types for the API crate.

use std::fmt;

use gigbook_core::Failure;
use thiserror::Error;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error categories for classification and user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client errors (4xx) without a more specific category
    Client,
    /// Server errors (5xx)
    Server,
    /// Request validation errors (400, 422)
    Validation,
    /// Authentication/authorization errors (401, 403)
    Auth,
    /// Missing record (404)
    NotFound,
    /// Unknown or uncategorized errors
    Unknown,
}

impl ErrorCategory {
    /// Categorize an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            400..=499 => Self::Client,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Fixed user-facing text for the category.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Client => "the request was rejected",
            Self::Server => "the server failed to process the request",
            Self::Validation => "the submitted data is invalid",
            Self::Auth => "you are not allowed to do that, please sign in again",
            Self::NotFound => "the requested record does not exist",
            Self::Unknown => "unexpected response from the server",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
            Self::Validation => write!(f, "validation"),
            Self::Auth => write!(f, "auth"),
            Self::NotFound => write!(f, "not found"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Errors that can occur during API calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request was superseded by a newer one and abandoned.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered with a non-success status.
    #[error("{category} error ({status}): {}", message_or_none(.message.as_deref()))]
    Status {
        status: u16,
        category: ErrorCategory,
        message: Option<String>,
    },

    /// Failed to reach the server.
    #[error("connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Invalid response body.
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    /// Configuration error.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

fn message_or_none(message: Option<&str>) -> &str {
    message.unwrap_or("no message")
}

impl ApiError {
    /// Create a status error, categorizing the code.
    pub fn status(status: u16, message: Option<String>) -> Self {
        Self::Status {
            status,
            category: ErrorCategory::from_status(status),
            message,
        }
    }

    /// Create a not found error for a record.
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::status(404, Some(format!("{what} not found")))
    }

    /// Create a connection failed error.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Create a config error.
    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }

    /// HTTP status of the failure, if the server answered.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Failure for ApiError {
    fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    fn kind_message(&self) -> Option<&'static str> {
        match self {
            Self::Cancelled => None,
            Self::Status { category, .. } => Some(category.message()),
            Self::ConnectionFailed { .. } => Some("could not reach the server"),
            Self::Timeout => Some("the server took too long to respond"),
            Self::InvalidResponse { .. } => Some("the server sent an unexpected response"),
            Self::ConfigError { .. } => Some("the client is misconfigured"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::invalid_response(e.to_string())
        } else if let Some(status) = e.status() {
            Self::status(status.as_u16(), None)
        } else if e.is_builder() {
            Self::config_error(e.to_string())
        } else {
            Self::connection_failed(e.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::config_error(format!("invalid URL: {e}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_response(e.to_string())
    }
}
