//! Status lines shown to the user after each operation

use envreq_errors::{Error, UserFacingError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    #[must_use]
    pub fn request_created(request_id: &str) -> Self {
        Self::success(format!("Environment Request Created! ID: {request_id}"))
    }

    #[must_use]
    pub fn jupyter_ready() -> Self {
        Self::success("Jupyter URL generated!")
    }

    /// Failure of `POST /env-request`, or of the form check before it
    #[must_use]
    pub fn submit_failed(error: &Error) -> Self {
        match error {
            Error::Validation(e) => Self::error(e.user_message()),
            e if e.is_timeout() => Self::error("Request timeout – please check your connection"),
            e => Self::error(format!("Failed to create request: {}", e.user_message())),
        }
    }

    /// Failure of the Jupyter URL exchange
    #[must_use]
    pub fn exchange_failed(error: &Error) -> Self {
        match error {
            Error::Validation(e) => Self::error(e.user_message()),
            e if e.is_timeout() => Self::error("Timeout – please try again"),
            e => Self::error(format!("Failed to generate URL: {}", e.user_message())),
        }
    }
}
