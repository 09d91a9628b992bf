use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Presigned Jupyter URL exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JupyterEvent {
    ExchangeStarted {
        request_id: String,
        expiry_minutes: u32,
        /// Chained from a submission rather than requested by hand
        chained: bool,
    },

    UrlGenerated {
        request_id: String,
        expires_at: DateTime<Utc>,
    },

    ExchangeFailed {
        request_id: String,
        failure: FailureContext,
    },

    /// The URL was withheld because its expiry already passed
    UrlExpired {
        request_id: String,
        expired_at: DateTime<Utc>,
    },
}
