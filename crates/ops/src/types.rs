//! Types for operations and results

use envreq_types::{EnvironmentRequestResult, IdeOption, JupyterAccess};
use serde::{Deserialize, Serialize};

/// Outcome of a completed submission
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitReport {
    pub request: EnvironmentRequestResult,
    pub ide_option: IdeOption,
    /// Present when the IDE is Jupyter and the chained exchange succeeded
    pub jupyter: Option<JupyterAccess>,
}

impl SubmitReport {
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request.request_id
    }
}
