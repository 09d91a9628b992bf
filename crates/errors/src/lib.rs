#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the envreq client
//!
//! This crate provides fine-grained error types organized by domain.
//! Every failure the client can surface falls into one of four buckets:
//! validation (caught before any network call), timeout, service (non-2xx)
//! and protocol (2xx with an unexpected body). See [`ErrorKind`].

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod network;
pub mod session;
pub mod validation;

// Re-export all error types at the root
pub use config::ConfigError;
pub use network::NetworkError;
pub use session::SessionError;
pub use validation::ValidationError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,
}

/// Coarse classification of an [`Error`], matching the client's failure taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Missing required input, detected before any network call.
    Validation,
    /// The client-side bound elapsed before the service answered.
    Timeout,
    /// The service answered with a non-success status.
    Service,
    /// The service answered 2xx with a body of the wrong shape.
    Protocol,
    /// The request never reached the service (DNS, refused, TLS, bad URL).
    Transport,
    Config,
    Session,
    Cancelled,
    Internal,
}

impl Error {
    /// Create an internal error with a message
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Network(err) => err.kind(),
            Error::Config(_) => ErrorKind::Config,
            Error::Session(_) => ErrorKind::Session,
            Error::Internal(_) => ErrorKind::Internal,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for envreq operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Validation(err) => err.user_message(),
            Error::Network(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Session(err) => err.user_message(),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_hint(),
            Error::Network(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Session(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_code(),
            Error::Network(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Session(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Cancelled => Some("error.cancelled"),
        }
    }
}
