//! Integration tests for events

#[cfg(test)]
mod tests {
    use envreq_errors::{Error, NetworkError, ValidationError};
    use envreq_events::*;
    use envreq_types::SessionPhase;

    #[tokio::test]
    async fn test_emitter_wraps_events_with_meta() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);
        assert_eq!(first.meta.source, EventSource::GENERAL);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.level, EventLevel::Debug);
        assert_ne!(first.meta.event_id, second.meta.event_id);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[test]
    fn test_correlation_id_follows_request_id() {
        let message = EventMessage::new(AppEvent::Jupyter(JupyterEvent::ExchangeStarted {
            request_id: "abc123".into(),
            expiry_minutes: 30,
            chained: true,
        }));
        assert_eq!(message.meta.correlation_id.as_deref(), Some("abc123"));
        assert_eq!(message.meta.source, EventSource::JUPYTER);
        assert_eq!(message.meta.level, EventLevel::Info);

        let idle = EventMessage::new(AppEvent::Session(SessionEvent::PhaseChanged {
            from: SessionPhase::Idle,
            to: SessionPhase::Submitting,
            request_id: None,
        }));
        assert!(idle.meta.correlation_id.is_none());
        assert_eq!(idle.meta.level, EventLevel::Debug);
    }

    #[test]
    fn test_failure_context_from_errors() {
        let timeout: Error = NetworkError::Timeout {
            url: "http://localhost:5000/env-request".into(),
            timeout_secs: 10,
        }
        .into();
        let ctx = FailureContext::from_error(&timeout);
        assert!(ctx.retryable);

        let service: Error = NetworkError::Service {
            status: 400,
            body: "bad input".into(),
        }
        .into();
        let ctx = FailureContext::from_error(&service);
        assert_eq!(ctx.message, "bad input");
        assert!(!ctx.retryable);

        let missing: Error = ValidationError::MissingRequestId.into();
        let ctx = FailureContext::from_error(&missing);
        assert_eq!(ctx.message, "Request ID is missing");
    }

    #[test]
    fn test_failed_events_log_at_error() {
        let event = AppEvent::Request(RequestEvent::SubmissionFailed {
            env_name: "analytics".into(),
            failure: FailureContext::new(None::<String>, "boom", None::<String>, false),
        });
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        assert_eq!(event.log_target(), "envreq::events::request");
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = AppEvent::Session(SessionEvent::Reset);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "session");
        assert_eq!(json["event"]["type"], "Reset");
    }
}
