//! Client session: the form being edited plus everything derived from it

use envreq_errors::{Error, SessionError};
use envreq_events::{AppEvent, EventEmitter, SessionEvent};
use envreq_types::{
    EnvironmentRequestForm, EnvironmentRequestResult, JupyterAccess, SessionPhase,
};
use serde::Serialize;

use crate::notice::Notice;

/// Mutable state for one user session.
///
/// Only the operation currently running may mutate it; operations take it by
/// `&mut` and move the phase through [`SessionPhase::can_transition_to`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub form: EnvironmentRequestForm,
    phase: SessionPhase,
    request: Option<EnvironmentRequestResult>,
    jupyter: Option<JupyterAccess>,
    notice: Option<Notice>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_form(form: EnvironmentRequestForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Session for a request created elsewhere, ready for a manual exchange
    #[must_use]
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            phase: SessionPhase::Submitted,
            request: Some(EnvironmentRequestResult::submitted(request_id)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn request(&self) -> Option<&EnvironmentRequestResult> {
        self.request.as_ref()
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request.as_ref().map(|r| r.request_id.as_str())
    }

    #[must_use]
    pub fn jupyter(&self) -> Option<&JupyterAccess> {
        self.jupyter.as_ref()
    }

    /// Last status line produced by an operation
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), Error> {
        if self.phase.is_busy() {
            return Err(SessionError::OperationInProgress {
                phase: self.phase.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub(crate) fn advance<E: EventEmitter>(
        &mut self,
        next: SessionPhase,
        emitter: &E,
    ) -> Result<(), Error> {
        if !self.phase.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        let from = std::mem::replace(&mut self.phase, next);
        emitter.emit(AppEvent::Session(SessionEvent::PhaseChanged {
            from,
            to: next,
            request_id: self.request_id().map(str::to_string),
        }));
        Ok(())
    }

    pub(crate) fn set_request(&mut self, request: EnvironmentRequestResult) {
        self.request = Some(request);
    }

    pub(crate) fn set_jupyter(&mut self, access: Option<JupyterAccess>) {
        self.jupyter = access;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Restore defaults without emitting anything
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
