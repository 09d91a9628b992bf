//! Read-only lookups against the provisioning service

use envreq_errors::Error;
use envreq_events::EventEmitter;
use envreq_types::{
    ActiveJupyterSessions, EnvRequestRecord, JupyterServiceConfig, JupyterStatus, ServiceHealth,
    TokenCleanup, TokenRevoked,
};

use crate::OpsCtx;

/// List every stored environment request
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn list_requests(ctx: &OpsCtx) -> Result<Vec<EnvRequestRecord>, Error> {
    ctx.emit_operation_started("list");
    let result = envreq_net::list_env_requests(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "list", result)
}

/// Fetch one stored environment request
///
/// # Errors
///
/// `ValidationError::MissingRequestId` for a blank id, otherwise the lookup
/// error (an unknown id is a 404 service error).
pub async fn request_info(ctx: &OpsCtx, request_id: &str) -> Result<EnvRequestRecord, Error> {
    ctx.emit_operation_started("show");
    let result = envreq_net::env_request_info(&ctx.net, request_id, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "show", result)
}

/// Check the service health endpoint
///
/// # Errors
///
/// Returns an error if the service cannot be reached or answers badly.
pub async fn service_health(ctx: &OpsCtx) -> Result<ServiceHealth, Error> {
    ctx.emit_operation_started("health");
    let result = envreq_net::check_service_health(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "health", result)
}

/// Ask the service whether its Jupyter server is running
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn jupyter_status(ctx: &OpsCtx) -> Result<JupyterStatus, Error> {
    ctx.emit_operation_started("jupyter-status");
    let result = envreq_net::jupyter_status(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "jupyter-status", result)
}

/// List the presigned tokens the service still holds
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn active_sessions(ctx: &OpsCtx) -> Result<ActiveJupyterSessions, Error> {
    ctx.emit_operation_started("sessions");
    let result = envreq_net::active_jupyter_sessions(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "sessions", result)
}

/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn jupyter_config(ctx: &OpsCtx) -> Result<JupyterServiceConfig, Error> {
    ctx.emit_operation_started("jupyter-config");
    let result = envreq_net::jupyter_config(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "jupyter-config", result)
}

/// Revoke a presigned token before it expires
///
/// # Errors
///
/// Validation error for a blank token, otherwise the service error (an
/// unknown token is a 404).
pub async fn revoke_token(ctx: &OpsCtx, token: &str) -> Result<TokenRevoked, Error> {
    ctx.emit_operation_started("revoke");
    let result = envreq_net::revoke_jupyter_token(&ctx.net, token, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "revoke", result)
}

/// Ask the service to drop its expired tokens
///
/// # Errors
///
/// Returns an error if the call fails.
pub async fn cleanup_tokens(ctx: &OpsCtx) -> Result<TokenCleanup, Error> {
    ctx.emit_operation_started("cleanup-tokens");
    let result = envreq_net::cleanup_expired_tokens(&ctx.net, &ctx.cancel, &ctx.tx).await;
    finish(ctx, "cleanup-tokens", result)
}

fn finish<T>(ctx: &OpsCtx, operation: &str, result: Result<T, Error>) -> Result<T, Error> {
    match &result {
        Ok(_) => ctx.emit_operation_completed(operation, true),
        Err(e) => ctx.emit_operation_failed(operation, e.to_string()),
    }
    result
}
