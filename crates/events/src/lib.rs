#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in envreq
//!
//! Library crates never print. They emit [`AppEvent`]s over an unbounded
//! channel and the CLI decides how to render and log them.
//!
//! ## Architecture
//!
//! - **Domain events**: grouped by concern (request, jupyter, session, general)
//! - **Unified `EventEmitter` trait**: one API whether you hold a raw sender or a context
//! - **Metadata envelope**: every event travels as an [`EventMessage`] with id, time and level

pub mod meta;
pub use meta::{EventLevel, EventMessage, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, FailureContext, GeneralEvent, JupyterEvent, RequestEvent, SessionEvent,
};

use tokio::sync::mpsc::UnboundedSender;

/// Sending half of the event channel
pub type EventSender = UnboundedSender<EventMessage>;

/// Receiving half of the event channel
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout envreq
///
/// Implementors only need to hand out their sender; everything else has a
/// default that wraps the event in an [`EventMessage`].
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // A dropped receiver just means nobody is listening
            let _ = sender.send(EventMessage::new(event));
        }
    }

    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    fn emit_debug_with_context(
        &self,
        message: impl Into<String>,
        context: std::collections::HashMap<String, String>,
    ) {
        self.emit(AppEvent::General(GeneralEvent::debug_with_context(
            message, context,
        )));
    }

    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    fn emit_error_with_details(&self, message: impl Into<String>, details: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error_with_details(
            message, details,
        )));
    }

    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
