//! Phases of a client session

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a session stands in the submit → exchange workflow.
///
/// ```text
/// Idle → Submitting → {Submitted | Failed}
/// Submitted → ExchangingJupyter → {JupyterReady | Failed}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Submitted,
    ExchangingJupyter,
    JupyterReady,
    Failed,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::ExchangingJupyter => "exchanging_jupyter",
            Self::JupyterReady => "jupyter_ready",
            Self::Failed => "failed",
        }
    }

    /// A network call is outstanding
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitting | Self::ExchangingJupyter)
    }

    /// Whether moving to `next` is allowed.
    ///
    /// A new submission may start from any settled phase; the exchange may
    /// be (re)started from any settled phase after a submission.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use SessionPhase::{
            ExchangingJupyter, Failed, Idle, JupyterReady, Submitted, Submitting,
        };
        match (self, next) {
            (_, Idle) => !self.is_busy(),
            // A validation failure settles without leaving a settled phase.
            (Idle | Submitted | JupyterReady | Failed, Submitting | Failed)
            | (Submitting, Submitted | Failed)
            | (Submitted | JupyterReady | Failed, ExchangingJupyter)
            | (ExchangingJupyter, JupyterReady | Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_paths() {
        assert!(SessionPhase::Idle.can_transition_to(SessionPhase::Submitting));
        assert!(SessionPhase::Submitting.can_transition_to(SessionPhase::Submitted));
        assert!(SessionPhase::Submitted.can_transition_to(SessionPhase::ExchangingJupyter));
        assert!(SessionPhase::ExchangingJupyter.can_transition_to(SessionPhase::JupyterReady));
    }

    #[test]
    fn test_busy_phases_cannot_restart() {
        assert!(!SessionPhase::Submitting.can_transition_to(SessionPhase::Submitting));
        assert!(!SessionPhase::Submitting.can_transition_to(SessionPhase::ExchangingJupyter));
        assert!(!SessionPhase::ExchangingJupyter.can_transition_to(SessionPhase::Idle));
        assert!(!SessionPhase::Idle.can_transition_to(SessionPhase::JupyterReady));
    }
}
