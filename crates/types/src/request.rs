//! Submitted environment requests

use serde::{Deserialize, Serialize};

/// Status the client attaches to a new request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Submitted,
}

impl RequestStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
        }
    }
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRequestResult {
    pub request_id: String,
    pub status: RequestStatus,
}

impl EnvironmentRequestResult {
    #[must_use]
    pub fn submitted(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: RequestStatus::Submitted,
        }
    }
}

/// A stored request as returned by `GET /env-request[/{id}]`.
///
/// Fields stay as strings; the service does not constrain them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvRequestRecord {
    pub request_id: String,
    pub env_name: String,
    #[serde(default)]
    pub env_purpose: String,
    #[serde(default)]
    pub use_case: String,
    #[serde(default)]
    pub data_domain: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub ide_option: String,
    #[serde(default)]
    pub framework_option: Option<String>,
    #[serde(default)]
    pub requested_by: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl EnvRequestRecord {
    /// Selected container image keys
    #[must_use]
    pub fn frameworks(&self) -> Vec<&str> {
        self.framework_option
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
