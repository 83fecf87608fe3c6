//! Transport-level error type shared by the ESC crates.
//!
//! The value and gate codecs never perform I/O. Anything that talks to the
//! service does so through a transport, and a transport reports its failures
//! with [`PlatformError`] so callers can decide whether to retry.

use thiserror::Error;

/// Error reported by a transport while talking to the ESC service.
///
/// All errors are classified as either retryable or non-retryable. Retrying
/// is always the caller's decision; nothing in this workspace retries.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Service is temporarily unavailable (connection refused, 5xx, ...)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The access token was missing or rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limited")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("Request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned by the service
        body: String,
    },

    /// Operation timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Check if this error is retryable.
    ///
    /// Retryable errors are transient failures that may succeed on retry,
    /// such as network issues, rate limiting, or temporary unavailability.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err = PlatformError::RateLimited;
    /// assert!(err.is_retryable());
    ///
    /// let err = PlatformError::NotFound("environment".to_string());
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::RateLimited | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Map an HTTP status and body to the matching error kind.
    ///
    /// Intended for transport implementations; `context` names the resource
    /// that was requested.
    #[must_use]
    pub fn from_status(status: u16, context: &str, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::AuthFailed(context.to_string()),
            404 => Self::NotFound(context.to_string()),
            429 => Self::RateLimited,
            502..=504 => Self::Unavailable(format!("{context}: status {status}")),
            _ => Self::Status {
                status,
                body: body.into(),
            },
        }
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a not found error for the given resource.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
