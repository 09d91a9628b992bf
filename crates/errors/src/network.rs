//! Network-related error types

use std::borrow::Cow;

use crate::{ErrorKind, UserFacingError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Non-success status; `body` is the response text, verbatim.
    #[error("HTTP error {status}: {body}")]
    Service { status: u16, body: String },

    #[error("invalid server response: {message}")]
    Protocol { message: String },

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl NetworkError {
    /// Build a protocol error with the standard "invalid server response" wording.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Service { .. } => ErrorKind::Service,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::ConnectionRefused(_) | Self::InvalidUrl(_) | Self::RequestFailed(_) => {
                ErrorKind::Transport
            }
        }
    }
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::Service { status, body } if body.trim().is_empty() => {
                Cow::Owned(format!("HTTP {status}"))
            }
            Self::Service { body, .. } => Cow::Borrowed(body.as_str()),
            Self::Protocol { .. } => Cow::Borrowed("Invalid server response"),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } => Some("Check your connection to the environment service."),
            Self::ConnectionRefused(_) => {
                Some("Verify the service base URL in your configuration or via --base-url.")
            }
            Self::InvalidUrl(_) => Some("Fix `service.base_url` in the configuration file."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::RequestFailed(_) => true,
            Self::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Timeout { .. } => "network.timeout",
            Self::Service { .. } => "network.service",
            Self::Protocol { .. } => "network.protocol",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::RequestFailed(_) => "network.request_failed",
        })
    }
}
