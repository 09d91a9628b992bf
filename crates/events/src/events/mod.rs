use serde::{Deserialize, Serialize};

use crate::EventSource;
use envreq_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod jupyter;
pub mod request;
pub mod session;

pub use general::*;
pub use jupyter::*;
pub use request::*;
pub use session::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Submission of environment requests and read-only lookups
    Request(RequestEvent),

    /// Presigned Jupyter URL exchange
    Jupyter(JupyterEvent),

    /// Session phase transitions
    Session(SessionEvent),
}

impl AppEvent {
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Request(_) => EventSource::REQUEST,
            Self::Jupyter(_) => EventSource::JUPYTER,
            Self::Session(_) => EventSource::SESSION,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Request(
                RequestEvent::SubmissionFailed { .. } | RequestEvent::QueryFailed { .. },
            )
            | Self::Jupyter(JupyterEvent::ExchangeFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Request(RequestEvent::ValidationFailed { .. })
            | Self::Jupyter(JupyterEvent::UrlExpired { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. } | GeneralEvent::ConfigurationLoaded { .. })
            | Self::Request(
                RequestEvent::QueryStarted { .. } | RequestEvent::QueryCompleted { .. },
            )
            | Self::Session(_) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "envreq::events::general",
            Self::Request(_) => "envreq::events::request",
            Self::Jupyter(_) => "envreq::events::jupyter",
            Self::Session(_) => "envreq::events::session",
        }
    }

    /// Request id the event belongs to, when the event carries one.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Request(RequestEvent::SubmissionCompleted { request_id, .. })
            | Self::Jupyter(
                JupyterEvent::ExchangeStarted { request_id, .. }
                | JupyterEvent::UrlGenerated { request_id, .. }
                | JupyterEvent::ExchangeFailed { request_id, .. }
                | JupyterEvent::UrlExpired { request_id, .. },
            ) => Some(request_id.as_str()),
            Self::Session(SessionEvent::PhaseChanged { request_id, .. }) => request_id.as_deref(),
            _ => None,
        }
    }
}
