//! Client-side validation errors, raised before any request is sent

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<String> },

    #[error("request id is missing")]
    MissingRequestId,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::MissingRequiredFields { .. } => {
                Cow::Borrowed("Env Name and Env Purpose are required")
            }
            Self::MissingRequestId => Cow::Borrowed("Request ID is missing"),
            Self::InvalidValue { .. } => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingRequiredFields { .. } => {
                Some("Provide both --name and --purpose, or fill them in the form.")
            }
            Self::MissingRequestId => Some("Submit a request first or pass its id explicitly."),
            Self::InvalidValue { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingRequiredFields { .. } => "validation.missing_fields",
            Self::MissingRequestId => "validation.missing_request_id",
            Self::InvalidValue { .. } => "validation.invalid_value",
        })
    }
}
