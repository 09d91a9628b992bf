//! Calls against the provisioning service

use std::collections::HashMap;
use std::time::Duration;

use envreq_errors::{Error, NetworkError, ValidationError};
use envreq_events::{AppEvent, EventEmitter, EventSender, FailureContext, RequestEvent};
use envreq_types::{
    ActiveJupyterSessions, EnvRequestCreated, EnvRequestPayload, EnvRequestRecord,
    JupyterAccess, JupyterServiceConfig, JupyterStatus, JupyterUrlEnvelope, ServiceHealth,
    TokenCleanup, TokenRevoked,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::{HttpReply, NetClient};

/// Create an environment request with `POST /env-request`.
///
/// # Errors
///
/// Timeout after the submit bound, `Service` for non-2xx (body verbatim),
/// `Protocol` when the 2xx body has no usable `request_id`.
pub async fn submit_env_request(
    client: &NetClient,
    payload: &EnvRequestPayload,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<EnvRequestCreated, Error> {
    let url = client.endpoint(&["env-request"])?;
    tx.emit_debug_with_context(
        "POST env-request",
        HashMap::from([("url".to_string(), url.to_string())]),
    );

    let reply = client
        .send_bounded(
            client.post(url.clone()).json(payload),
            &url,
            client.config().submit_timeout,
            cancel,
        )
        .await?
        .error_for_status()?;

    let created: EnvRequestCreated = reply.json()?;
    if created.request_id.trim().is_empty() {
        return Err(NetworkError::protocol("empty request_id").into());
    }
    Ok(created)
}

/// Exchange a request id for a presigned Jupyter URL with
/// `POST /generate-jupyter-url/{id}?expiry_minutes={n}`.
///
/// # Errors
///
/// `ValidationError::MissingRequestId` for a blank id (no call is made),
/// timeout after the exchange bound, `Service` for non-2xx, `Protocol` when
/// `success` is false, `data` is missing or `expires_at` does not parse.
pub async fn generate_jupyter_url(
    client: &NetClient,
    request_id: &str,
    expiry_minutes: u32,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<JupyterAccess, Error> {
    if request_id.trim().is_empty() {
        return Err(ValidationError::MissingRequestId.into());
    }

    let mut url = client.endpoint(&["generate-jupyter-url", request_id])?;
    url.query_pairs_mut()
        .append_pair("expiry_minutes", &expiry_minutes.to_string());
    tx.emit_debug_with_context(
        "POST generate-jupyter-url",
        HashMap::from([
            ("url".to_string(), url.to_string()),
            ("request_id".to_string(), request_id.to_string()),
        ]),
    );

    let reply = client
        .send_bounded(
            client.post(url.clone()),
            &url,
            client.config().exchange_timeout,
            cancel,
        )
        .await?
        .error_for_status()?;

    let envelope: JupyterUrlEnvelope = reply.json()?;
    match envelope {
        JupyterUrlEnvelope {
            success: true,
            data: Some(data),
        } => Ok(JupyterAccess::try_from(data)?),
        JupyterUrlEnvelope { success: false, .. } => {
            Err(NetworkError::protocol("success flag was false").into())
        }
        JupyterUrlEnvelope { data: None, .. } => {
            Err(NetworkError::protocol("missing data").into())
        }
    }
}

/// `GET /env-request`
///
/// # Errors
///
/// Same taxonomy as the other calls, bounded by the query timeout.
pub async fn list_env_requests(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<Vec<EnvRequestRecord>, Error> {
    query(client, Method::GET, &["env-request"], None, cancel, tx).await
}

/// `GET /env-request/{id}`
///
/// # Errors
///
/// `ValidationError::MissingRequestId` for a blank id, otherwise as
/// [`list_env_requests`]. An unknown id comes back as a 404 service error.
pub async fn env_request_info(
    client: &NetClient,
    request_id: &str,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<EnvRequestRecord, Error> {
    if request_id.trim().is_empty() {
        return Err(ValidationError::MissingRequestId.into());
    }
    query(client, Method::GET, &["env-request", request_id], None, cancel, tx).await
}

/// `GET /health`
///
/// # Errors
///
/// Same taxonomy as [`list_env_requests`].
pub async fn check_service_health(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<ServiceHealth, Error> {
    query(client, Method::GET, &["health"], None, cancel, tx).await
}

/// `GET /jupyter-status`
///
/// # Errors
///
/// Same taxonomy as [`list_env_requests`].
pub async fn jupyter_status(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<JupyterStatus, Error> {
    query(client, Method::GET, &["jupyter-status"], None, cancel, tx).await
}

/// `GET /active-jupyter-sessions`
///
/// # Errors
///
/// Same taxonomy as [`list_env_requests`].
pub async fn active_jupyter_sessions(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<ActiveJupyterSessions, Error> {
    query(client, Method::GET, &["active-jupyter-sessions"], None, cancel, tx).await
}

/// `GET /jupyter-config`
///
/// # Errors
///
/// Same taxonomy as [`list_env_requests`].
pub async fn jupyter_config(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<JupyterServiceConfig, Error> {
    query(client, Method::GET, &["jupyter-config"], None, cancel, tx).await
}

/// Revoke one presigned token with `DELETE /revoke-jupyter-token/{token}`.
///
/// The token never appears in emitted events.
///
/// # Errors
///
/// `ValidationError::InvalidValue` for a blank token, otherwise as
/// [`list_env_requests`]. An unknown token comes back as a 404 service error.
pub async fn revoke_jupyter_token(
    client: &NetClient,
    token: &str,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<TokenRevoked, Error> {
    if token.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "token".to_string(),
            value: token.to_string(),
        }
        .into());
    }
    query(
        client,
        Method::DELETE,
        &["revoke-jupyter-token", token],
        Some("/revoke-jupyter-token/{token}"),
        cancel,
        tx,
    )
    .await
}

/// Drop every expired token with `POST /cleanup-expired-tokens`.
///
/// # Errors
///
/// Same taxonomy as [`list_env_requests`].
pub async fn cleanup_expired_tokens(
    client: &NetClient,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<TokenCleanup, Error> {
    query(client, Method::POST, &["cleanup-expired-tokens"], None, cancel, tx).await
}

/// `label` replaces the path in events when the path carries a secret.
async fn query<T: DeserializeOwned>(
    client: &NetClient,
    method: Method,
    segments: &[&str],
    label: Option<&str>,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<T, Error> {
    let url = client.endpoint(segments)?;
    let endpoint = label.map_or_else(|| url.path().to_string(), str::to_string);
    tx.emit(AppEvent::Request(RequestEvent::QueryStarted {
        endpoint: endpoint.clone(),
    }));

    let mut result = fetch(client, method, &url, client.config().query_timeout, cancel).await;
    if let (Some(label), Err(e)) = (label, &mut result) {
        redact_url(e, &url, label);
    }
    match &result {
        Ok((status, _)) => tx.emit(AppEvent::Request(RequestEvent::QueryCompleted {
            endpoint,
            status: *status,
        })),
        Err(e) => tx.emit(AppEvent::Request(RequestEvent::QueryFailed {
            endpoint,
            failure: FailureContext::from_error(e),
        })),
    }
    result.map(|(_, value)| value)
}

async fn fetch<T: DeserializeOwned>(
    client: &NetClient,
    method: Method,
    url: &url::Url,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<(u16, T), Error> {
    let reply: HttpReply = client
        .send_bounded(client.request(method, url.clone()), url, limit, cancel)
        .await?
        .error_for_status()?;
    let value = reply.json()?;
    Ok((reply.status, value))
}

/// Swap the full request URL for `label` inside transport errors
fn redact_url(error: &mut Error, url: &url::Url, label: &str) {
    let Error::Network(network) = error else {
        return;
    };
    match network {
        NetworkError::Timeout { url: text, .. }
        | NetworkError::ConnectionRefused(text)
        | NetworkError::RequestFailed(text) => {
            *text = text.replace(url.as_str(), label);
        }
        _ => {}
    }
}
