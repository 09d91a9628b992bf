#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for envreq
//!
//! This crate sits between the CLI and the network layer. It owns the
//! session state machine: validation, submission, the chained Jupyter URL
//! exchange, and the status notices shown after each step.

mod context;
mod notice;
mod query;
mod session;
mod types;
mod workflow;

pub use context::{OpsContextBuilder, OpsCtx};
pub use notice::{Notice, NoticeLevel};
pub use session::SessionState;
pub use types::SubmitReport;

pub use query::{
    active_sessions, cleanup_tokens, jupyter_config, jupyter_status, list_requests, request_info,
    revoke_token, service_health,
};
pub use workflow::{fetch_jupyter_access, reset, submit};

use envreq_errors::Error;
use envreq_types::{
    ActiveJupyterSessions, EnvRequestRecord, JupyterAccess, JupyterServiceConfig, JupyterStatus,
    ServiceHealth, TokenCleanup, TokenRevoked,
};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Request created, possibly with its Jupyter URL
    Submitted(SubmitReport),
    /// Presigned Jupyter URL
    JupyterAccess(JupyterAccess),
    RequestList(Vec<EnvRequestRecord>),
    RequestInfo(EnvRequestRecord),
    ServiceHealth(ServiceHealth),
    JupyterStatus(JupyterStatus),
    ActiveSessions(ActiveJupyterSessions),
    JupyterConfig(JupyterServiceConfig),
    TokenRevoked(TokenRevoked),
    TokenCleanup(TokenCleanup),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::ServiceHealth(health) => health.is_healthy(),
            OperationResult::JupyterStatus(status) => status.jupyter_running,
            OperationResult::TokenRevoked(revoked) => revoked.success,
            OperationResult::Submitted(_)
            | OperationResult::JupyterAccess(_)
            | OperationResult::RequestList(_)
            | OperationResult::RequestInfo(_)
            | OperationResult::ActiveSessions(_)
            | OperationResult::JupyterConfig(_)
            | OperationResult::TokenCleanup(_) => true,
        }
    }
}
