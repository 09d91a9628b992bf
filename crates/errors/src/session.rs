//! Session state machine errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionError {
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("an operation is already in progress ({phase})")]
    OperationInProgress { phase: String },
}

impl UserFacingError for SessionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OperationInProgress { .. } => Some("Wait for the current operation to finish."),
            Self::InvalidTransition { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::InvalidTransition { .. } => "session.invalid_transition",
            Self::OperationInProgress { .. } => "session.busy",
        })
    }
}
