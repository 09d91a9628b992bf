//! JSON shapes exchanged with the provisioning service

use serde::{Deserialize, Serialize};

use crate::form::{IdeOption, InstanceType};
use crate::request::RequestStatus;

/// Body of `POST /env-request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvRequestPayload {
    pub env_name: String,
    pub env_purpose: String,
    pub use_case: String,
    pub data_domain: String,
    pub instance_type: InstanceType,
    pub ide_option: IdeOption,
    /// Comma-joined container image keys
    pub framework_option: String,
    pub requested_by: String,
    pub status: RequestStatus,
}

/// 2xx body of `POST /env-request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvRequestCreated {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 2xx body of `POST /generate-jupyter-url/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterUrlEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<JupyterUrlData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterUrlData {
    pub presigned_url: String,
    /// ISO-8601; a naive timestamp is taken as UTC
    pub expires_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ServiceHealth {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// `GET /jupyter-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterStatus {
    pub jupyter_running: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /active-jupyter-sessions`
///
/// The service prunes expired tokens while answering; `expired_cleaned`
/// counts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveJupyterSessions {
    pub active_sessions: usize,
    #[serde(default)]
    pub expired_cleaned: usize,
    #[serde(default)]
    pub sessions: Vec<JupyterSessionInfo>,
}

/// One live presigned token. Only a prefix of the token is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterSessionInfo {
    pub token_preview: String,
    pub request_id: String,
    #[serde(default)]
    pub env_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub expires_at: String,
    #[serde(default)]
    pub expires_in_minutes: i64,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,
}

/// `GET /jupyter-config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterServiceConfig {
    pub base_url: String,
    pub default_expiry_minutes: u32,
    #[serde(default)]
    pub token_configured: bool,
}

/// `DELETE /revoke-jupyter-token/{token}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRevoked {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub revoked_token_info: RevokedTokenInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedTokenInfo {
    pub request_id: String,
    #[serde(default)]
    pub env_name: String,
    #[serde(default)]
    pub was_used: bool,
}

/// `POST /cleanup-expired-tokens`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCleanup {
    pub cleaned_up: usize,
    pub remaining_active: usize,
}
