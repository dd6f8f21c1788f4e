//! Save Error Types
//!
//! This module defines the errors a document save can end with. They are
//! produced by the REST client and carried by the auto-save coordinator in its
//! published state, so every variant is `Clone`.
//!
//! # Error Categories
//!
//! - `Network` / `Timeout` - transport failures, always transient
//! - `Server` - non-success HTTP status from the backend
//! - `Unauthorized` - the session token was rejected
//! - `Serialization` - request or response body could not be (de)serialized
//! - `Aborted` - the save task panicked or was cancelled
//! - `SessionClosed` - the coordinator behind a handle has shut down
//!
//! # Usage
//!
//! ```rust
//! use xfdocs::shared::error::SaveError;
//!
//! let error = SaveError::server(503, "maintenance");
//! assert!(error.is_transient());
//! ```
use thiserror::Error;

/// Errors that can end a save attempt
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The request never reached the server or the connection dropped
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// The server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The bearer token was missing or rejected
    #[error("Not authorized to save this document")]
    Unauthorized,

    /// The save did not resolve within the configured timeout
    #[error("Save timed out after {after_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds
        after_ms: u64,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// The save task ended without producing a result
    #[error("Save aborted: {message}")]
    Aborted {
        /// Human-readable error message
        message: String,
    },

    /// The editor session was torn down
    #[error("Editor session is closed")]
    SessionClosed,
}

impl SaveError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether the next edit or a manual save could reasonably succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            Self::Unauthorized
            | Self::Serialization { .. }
            | Self::Aborted { .. }
            | Self::SessionClosed => false,
        }
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for SaveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::serialization(err.to_string());
        }
        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => Self::Unauthorized,
            Some(status) => Self::server(status.as_u16(), err.to_string()),
            None => Self::network(err.to_string()),
        }
    }
}
