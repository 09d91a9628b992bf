use serde::{Deserialize, Serialize};

use envreq_types::{IdeOption, InstanceType};

use super::FailureContext;

/// Environment request submission and lookups against the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestEvent {
    /// Form rejected before any network call
    ValidationFailed { missing_fields: Vec<String> },

    SubmissionStarted {
        env_name: String,
        instance_type: InstanceType,
        ide_option: IdeOption,
        frameworks: String,
        url: String,
    },

    SubmissionCompleted {
        request_id: String,
        env_name: String,
    },

    SubmissionFailed {
        env_name: String,
        failure: FailureContext,
    },

    /// Read-only call (`list`, `show`, health checks)
    QueryStarted { endpoint: String },

    QueryCompleted { endpoint: String, status: u16 },

    QueryFailed {
        endpoint: String,
        failure: FailureContext,
    },
}
