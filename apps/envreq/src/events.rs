//! Event handling and status display

use console::{Style, Term};
use envreq_events::{AppEvent, EventMessage, GeneralEvent, JupyterEvent, RequestEvent};

use crate::logging::log_event_with_tracing;

/// Turns library events into log records and short status lines on stderr
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    /// Status lines are suppressed (JSON output keeps stderr quiet too)
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);
        if self.quiet {
            return;
        }

        match &message.event {
            AppEvent::Request(RequestEvent::SubmissionStarted {
                env_name,
                instance_type,
                ide_option,
                ..
            }) => {
                self.show_status(&format!(
                    "Submitting '{env_name}' ({instance_type}, {})...",
                    ide_option.label()
                ));
            }
            AppEvent::Jupyter(JupyterEvent::ExchangeStarted {
                request_id,
                expiry_minutes,
                ..
            }) => {
                self.show_status(&format!(
                    "Generating Jupyter URL for {request_id} (valid {expiry_minutes} min)..."
                ));
            }
            AppEvent::Jupyter(JupyterEvent::UrlExpired { expired_at, .. }) => {
                self.show_warning(&format!(
                    "Jupyter URL expired at {}; it will not be shown",
                    expired_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S %Z")
                ));
            }
            AppEvent::General(GeneralEvent::Warning { message, .. }) => {
                self.show_warning(message);
            }
            AppEvent::General(GeneralEvent::Error { message, .. }) => {
                self.show_error(message);
            }
            _ => {}
        }
    }

    fn show_status(&self, message: &str) {
        let line = self.paint(Style::new().dim(), message);
        let _ = self.term.write_line(&line);
    }

    fn show_warning(&self, message: &str) {
        let line = self.paint(Style::new().yellow(), &format!("Warning: {message}"));
        let _ = self.term.write_line(&line);
    }

    fn show_error(&self, message: &str) {
        let line = self.paint(Style::new().red(), &format!("Error: {message}"));
        let _ = self.term.write_line(&line);
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colors_enabled {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
