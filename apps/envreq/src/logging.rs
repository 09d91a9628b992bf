//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so the
//! JSON log file can be filtered by request id, source or endpoint.

use envreq_events::{
    AppEvent, EventMessage, GeneralEvent, JupyterEvent, RequestEvent, SessionEvent,
};
use tracing::{debug, error, info, trace, warn};

/// Log an `AppEvent` at its own level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Request(request_event) => match request_event {
            RequestEvent::ValidationFailed { missing_fields } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    missing = ?missing_fields,
                    "Form validation failed"
                );
            }
            RequestEvent::SubmissionStarted {
                env_name,
                instance_type,
                ide_option,
                frameworks,
                url,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    env_name = %env_name,
                    instance_type = %instance_type,
                    ide_option = %ide_option,
                    frameworks = %frameworks,
                    url = %url,
                    "Environment request submission started"
                );
            }
            RequestEvent::SubmissionCompleted {
                request_id,
                env_name,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    request_id = %request_id,
                    env_name = %env_name,
                    "Environment request created"
                );
            }
            RequestEvent::SubmissionFailed { env_name, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    env_name = %env_name,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Environment request submission failed"
                );
            }
            RequestEvent::QueryStarted { endpoint } => {
                debug!(source = meta.source.as_str(), endpoint = %endpoint, "Query started");
            }
            RequestEvent::QueryCompleted { endpoint, status } => {
                debug!(
                    source = meta.source.as_str(),
                    endpoint = %endpoint,
                    status = status,
                    "Query completed"
                );
            }
            RequestEvent::QueryFailed { endpoint, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    endpoint = %endpoint,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    "Query failed"
                );
            }
        },

        AppEvent::Jupyter(jupyter_event) => match jupyter_event {
            JupyterEvent::ExchangeStarted {
                request_id,
                expiry_minutes,
                chained,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    request_id = %request_id,
                    expiry_minutes = expiry_minutes,
                    chained = chained,
                    "Jupyter URL exchange started"
                );
            }
            JupyterEvent::UrlGenerated {
                request_id,
                expires_at,
            } => {
                // The presigned URL itself is a credential and stays out of the logs
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    request_id = %request_id,
                    expires_at = %expires_at,
                    "Jupyter URL generated"
                );
            }
            JupyterEvent::ExchangeFailed {
                request_id,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    request_id = %request_id,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Jupyter URL exchange failed"
                );
            }
            JupyterEvent::UrlExpired {
                request_id,
                expired_at,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    request_id = %request_id,
                    expired_at = %expired_at,
                    "Jupyter URL already expired"
                );
            }
        },

        AppEvent::Session(session_event) => match session_event {
            SessionEvent::PhaseChanged {
                from,
                to,
                request_id,
            } => {
                trace!(
                    source = meta.source.as_str(),
                    from = %from,
                    to = %to,
                    request_id = ?request_id,
                    "Session phase changed"
                );
            }
            SessionEvent::Reset => {
                debug!(source = meta.source.as_str(), "Session reset");
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    details = ?details,
                    "Error"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
            GeneralEvent::ConfigurationLoaded { source, base_url } => {
                debug!(
                    source = meta.source.as_str(),
                    config_source = %source,
                    base_url = %base_url,
                    "Configuration loaded"
                );
            }
            _ => match meta.tracing_level() {
                tracing::Level::ERROR => {
                    error!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::WARN => {
                    warn!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::INFO => {
                    info!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::DEBUG => {
                    debug!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::TRACE => {
                    trace!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
            },
        },
    }
}
