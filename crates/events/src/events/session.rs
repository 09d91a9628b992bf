use serde::{Deserialize, Serialize};

use envreq_types::SessionPhase;

/// Session state machine transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    PhaseChanged {
        from: SessionPhase,
        to: SessionPhase,
        request_id: Option<String>,
    },

    /// Form and derived results cleared back to defaults
    Reset,
}
