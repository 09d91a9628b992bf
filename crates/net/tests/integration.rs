//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use envreq_errors::{Error, ErrorKind, NetworkError, ValidationError};
    use envreq_events::{channel, AppEvent, RequestEvent};
    use envreq_net::*;
    use envreq_types::{EnvironmentRequestForm, FrameworkOption};
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    fn client_for(server: &MockServer, config: NetConfig) -> NetClient {
        NetClient::new(Url::parse(&server.base_url()).unwrap(), config).unwrap()
    }

    fn filled_form() -> EnvironmentRequestForm {
        let mut form = EnvironmentRequestForm {
            env_name: "churn-model".into(),
            env_purpose: "train churn classifier".into(),
            ..EnvironmentRequestForm::default()
        };
        form.toggle_framework(FrameworkOption::Xgboost);
        form.toggle_framework(FrameworkOption::Pytorch);
        form
    }

    #[tokio::test]
    async fn test_submit_posts_payload_and_returns_id() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/env-request")
                .json_body_partial(
                    r#"{"env_name":"churn-model","framework_option":"xgboost,pytorch","requested_by":"anonymous","status":"submitted"}"#,
                );
            then.status(200)
                .json_body(json!({"request_id": "abc123", "message": "Saved successfully"}));
        });

        let client = client_for(&server, NetConfig::default());
        let payload = filled_form().to_payload("anonymous");
        let created = submit_env_request(&client, &payload, &CancellationToken::new(), &tx)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(created.request_id, "abc123");
        assert_eq!(created.message.as_deref(), Some("Saved successfully"));
    }

    #[tokio::test]
    async fn test_submit_service_error_keeps_body() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(POST).path("/env-request");
            then.status(400).body("bad input");
        });

        let client = client_for(&server, NetConfig::default());
        let payload = filled_form().to_payload("anonymous");
        let err = submit_env_request(&client, &payload, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.to_string().contains("bad input"));
    }

    #[tokio::test]
    async fn test_submit_times_out_after_one_call() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/env-request");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"request_id": "late"}));
        });

        let config = NetConfig {
            submit_timeout: Duration::from_secs(1),
            ..NetConfig::default()
        };
        let client = client_for(&server, config);
        let payload = filled_form().to_payload("anonymous");
        let err = submit_env_request(&client, &payload, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(matches!(
            err,
            Error::Network(NetworkError::Timeout { timeout_secs: 1, .. })
        ));
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_submit_rejects_body_without_request_id() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(POST).path("/env-request");
            then.status(200).json_body(json!({"message": "ok"}));
        });

        let client = client_for(&server, NetConfig::default());
        let payload = filled_form().to_payload("anonymous");
        let err = submit_env_request(&client, &payload, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_generate_jupyter_url_success() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/generate-jupyter-url/abc123")
                .query_param("expiry_minutes", "30");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "presigned_url": "https://x",
                    "expires_at": "2025-01-01T00:30:00Z"
                }
            }));
        });

        let client = client_for(&server, NetConfig::default());
        let access = generate_jupyter_url(&client, "abc123", 30, &CancellationToken::new(), &tx)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(access.presigned_url, "https://x");
        assert_eq!(
            access.expires_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 30, 0).unwrap()
        );
        assert_eq!(access.expiry_display_in(&Utc), "2025-01-01 00:30:00 UTC");
    }

    #[tokio::test]
    async fn test_generate_jupyter_url_success_false_is_protocol_error() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(POST).path("/generate-jupyter-url/abc123");
            then.status(200).json_body(json!({"success": false}));
        });

        let client = client_for(&server, NetConfig::default());
        let err = generate_jupyter_url(&client, "abc123", 30, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_generate_jupyter_url_bad_expiry_is_protocol_error() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(POST).path("/generate-jupyter-url/abc123");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"presigned_url": "https://x", "expires_at": "tomorrow"}
            }));
        });

        let client = client_for(&server, NetConfig::default());
        let err = generate_jupyter_url(&client, "abc123", 30, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_generate_jupyter_url_blank_id_makes_no_call() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = client_for(&server, NetConfig::default());
        let err = generate_jupyter_url(&client, "  ", 30, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingRequestId)
        ));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_generate_jupyter_url_times_out_after_one_call() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate-jupyter-url/abc123");
            then.status(200).delay(Duration::from_secs(3)).json_body(json!({
                "success": true,
                "data": {"presigned_url": "https://x", "expires_at": "2025-01-01T00:30:00Z"}
            }));
        });

        let config = NetConfig {
            exchange_timeout: Duration::from_secs(1),
            ..NetConfig::default()
        };
        let client = client_for(&server, config);
        let err = generate_jupyter_url(&client, "abc123", 30, &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::Timeout { timeout_secs: 1, .. })
        ));
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_cancellation_while_waiting() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(POST).path("/generate-jupyter-url/abc123");
            then.status(200).delay(Duration::from_secs(5));
        });

        let client = client_for(&server, NetConfig::default());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = generate_jupyter_url(&client, "abc123", 30, &cancel, &tx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_list_and_info_queries() {
        let server = MockServer::start();
        let (tx, mut rx) = channel();

        server.mock(|when, then| {
            when.method(GET).path("/env-request");
            then.status(200).json_body(json!([
                {"request_id": "abc123", "env_name": "churn-model", "ide_option": "jupyter",
                 "framework_option": "xgboost,pytorch"},
                {"request_id": "def456", "env_name": "fraud", "ide_option": "vscode"}
            ]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/env-request/missing");
            then.status(404).body(r#"{"detail":"Not found"}"#);
        });

        let client = client_for(&server, NetConfig::default());
        let cancel = CancellationToken::new();

        let records = list_env_requests(&client, &cancel, &tx).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frameworks(), vec!["xgboost", "pytorch"]);

        let err = env_request_info(&client, "missing", &cancel, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::Service { status: 404, .. })
        ));

        let mut started = 0;
        let mut failed = 0;
        while let Ok(message) = rx.try_recv() {
            match message.event {
                AppEvent::Request(RequestEvent::QueryStarted { .. }) => started += 1,
                AppEvent::Request(RequestEvent::QueryFailed { .. }) => failed += 1,
                _ => {}
            }
        }
        assert_eq!(started, 2);
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn test_health_and_jupyter_status() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .json_body(json!({"status": "healthy", "service": "Environment Management API"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/jupyter-status");
            then.status(200).json_body(json!({
                "jupyter_running": false,
                "status": "stopped",
                "error": "connection refused"
            }));
        });

        let client = client_for(&server, NetConfig::default());
        let cancel = CancellationToken::new();

        let health = check_service_health(&client, &cancel, &tx).await.unwrap();
        assert!(health.is_healthy());

        let status = jupyter_status(&client, &cancel, &tx).await.unwrap();
        assert!(!status.jupyter_running);
        assert_eq!(status.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_active_sessions_and_jupyter_config() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(GET).path("/active-jupyter-sessions");
            then.status(200).json_body(json!({
                "active_sessions": 1,
                "expired_cleaned": 2,
                "sessions": [{
                    "token_preview": "Xk3vQ9aB...",
                    "request_id": "abc123",
                    "env_name": "churn-model",
                    "requested_by": "anonymous",
                    "created_at": "2025-01-01T00:00:00",
                    "expires_at": "2025-01-01T00:30:00",
                    "expires_in_minutes": 12,
                    "used_count": 3,
                    "last_accessed": null
                }]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/jupyter-config");
            then.status(200).json_body(json!({
                "base_url": "http://jupyter.internal:8888",
                "default_expiry_minutes": 1,
                "token_configured": false
            }));
        });

        let client = client_for(&server, NetConfig::default());
        let cancel = CancellationToken::new();

        let active = active_jupyter_sessions(&client, &cancel, &tx).await.unwrap();
        assert_eq!(active.active_sessions, 1);
        assert_eq!(active.expired_cleaned, 2);
        assert_eq!(active.sessions[0].request_id, "abc123");
        assert_eq!(active.sessions[0].used_count, 3);
        assert!(active.sessions[0].last_accessed.is_none());

        let config = jupyter_config(&client, &cancel, &tx).await.unwrap();
        assert_eq!(config.base_url, "http://jupyter.internal:8888");
        assert_eq!(config.default_expiry_minutes, 1);
        assert!(!config.token_configured);
    }

    #[tokio::test]
    async fn test_revoke_token_uses_delete() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let revoke = server.mock(|when, then| {
            when.method(DELETE).path("/revoke-jupyter-token/tok-123");
            then.status(200).json_body(json!({
                "success": true,
                "message": "Presigned token revoked successfully",
                "revoked_token_info": {"request_id": "abc123", "env_name": "churn-model", "was_used": true}
            }));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/revoke-jupyter-token/gone");
            then.status(404).body(r#"{"detail":"Presigned token not found"}"#);
        });

        let client = client_for(&server, NetConfig::default());
        let cancel = CancellationToken::new();

        let revoked = revoke_jupyter_token(&client, "tok-123", &cancel, &tx)
            .await
            .unwrap();
        revoke.assert();
        assert!(revoked.success);
        assert_eq!(revoked.revoked_token_info.request_id, "abc123");
        assert!(revoked.revoked_token_info.was_used);

        let err = revoke_jupyter_token(&client, "gone", &cancel, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::Service { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_revoke_blank_token_makes_no_call() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(DELETE);
            then.status(200);
        });

        let client = client_for(&server, NetConfig::default());
        let err = revoke_jupyter_token(&client, " ", &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_revoke_keeps_token_out_of_events_and_errors() {
        let server = MockServer::start();
        let (tx, mut rx) = channel();

        server.mock(|when, then| {
            when.method(DELETE).path("/revoke-jupyter-token/s3cret-token");
            then.status(200).delay(Duration::from_secs(3));
        });

        let config = NetConfig {
            query_timeout: Duration::from_secs(1),
            ..NetConfig::default()
        };
        let client = client_for(&server, config);
        let err = revoke_jupyter_token(&client, "s3cret-token", &CancellationToken::new(), &tx)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(!err.to_string().contains("s3cret-token"));
        while let Ok(message) = rx.try_recv() {
            let rendered = serde_json::to_string(&message.event).unwrap();
            assert!(!rendered.contains("s3cret-token"), "{rendered}");
        }
    }

    #[tokio::test]
    async fn test_cleanup_expired_tokens_posts() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/cleanup-expired-tokens");
            then.status(200)
                .json_body(json!({"cleaned_up": 4, "remaining_active": 1}));
        });

        let client = client_for(&server, NetConfig::default());
        let cleanup = cleanup_expired_tokens(&client, &CancellationToken::new(), &tx)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(cleanup.cleaned_up, 4);
        assert_eq!(cleanup.remaining_active, 1);
    }
}
