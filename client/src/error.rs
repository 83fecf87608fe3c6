//! ESC client error types using thiserror 2.0.
//!
//! Wraps transport failures from [`PlatformError`] and decode failures from
//! the value and gate crates so `?` composes across them.

use esc_gates::GateError;
use esc_values::ValueError;
use rust_common::PlatformError;
use thiserror::Error;

/// ESC client errors.
#[derive(Error, Debug)]
pub enum EscError {
    /// Transport failure
    #[error(transparent)]
    Transport(#[from] PlatformError),

    /// Environment body could not be decoded or navigated
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Gate body could not be encoded or decoded
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The service answered with no body where one was expected
    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

/// Result type for ESC client operations.
pub type EscResult<T> = Result<T, EscError>;

impl EscError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an empty response error.
    #[must_use]
    pub fn empty_response(operation: impl Into<String>) -> Self {
        Self::EmptyResponse(operation.into())
    }
}
