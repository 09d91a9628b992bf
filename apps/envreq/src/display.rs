//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use envreq_ops::{OperationResult, SubmitReport};
use envreq_types::{
    ActiveJupyterSessions, ColorChoice, EnvRequestRecord, JupyterAccess, JupyterServiceConfig,
    JupyterStatus, OutputFormat, ServiceHealth, TokenRevoked,
};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    format: OutputFormat,
    color_choice: ColorChoice,
    term: Term,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.render_json(result),
            OutputFormat::Tty | OutputFormat::Plain => self.render_text(result),
        }
    }

    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    fn render_text(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Submitted(report) => self.render_submit_report(report),
            OperationResult::JupyterAccess(access) => {
                self.success_line("Jupyter URL generated!")?;
                self.render_access(access)
            }
            OperationResult::RequestList(records) => self.render_request_list(records),
            OperationResult::RequestInfo(record) => self.render_request_info(record),
            OperationResult::ServiceHealth(health) => self.render_health(health),
            OperationResult::JupyterStatus(status) => self.render_jupyter_status(status),
            OperationResult::ActiveSessions(active) => self.render_active_sessions(active),
            OperationResult::JupyterConfig(config) => self.render_jupyter_config(config),
            OperationResult::TokenRevoked(revoked) => self.render_revoked(revoked),
            OperationResult::TokenCleanup(cleanup) => self.success_line(&format!(
                "Removed {} expired token(s), {} still active",
                cleanup.cleaned_up, cleanup.remaining_active
            )),
        }
    }

    fn render_submit_report(&self, report: &SubmitReport) -> io::Result<()> {
        self.success_line(&format!(
            "Environment Request Created! ID: {}",
            report.request_id()
        ))?;
        if let Some(access) = &report.jupyter {
            self.success_line("Jupyter URL generated!")?;
            self.render_access(access)?;
        }
        Ok(())
    }

    fn render_access(&self, access: &JupyterAccess) -> io::Result<()> {
        let expires = access.expiry_display();
        let remaining = access
            .remaining_at(chrono::Utc::now())
            .map(|left| format!("{} min", left.num_minutes()));

        if self.format == OutputFormat::Plain {
            self.term.write_line(&access.presigned_url)?;
            return self.term.write_line(&format!("Expires: {expires}"));
        }

        let mut table = self.new_table();
        table.add_row(vec![
            Cell::new("Jupyter URL").add_attribute(Attribute::Bold),
            Cell::new(&access.presigned_url).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("Expires").add_attribute(Attribute::Bold),
            Cell::new(expires),
        ]);
        if let Some(remaining) = remaining {
            table.add_row(vec![
                Cell::new("Remaining").add_attribute(Attribute::Bold),
                Cell::new(remaining),
            ]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_request_list(&self, records: &[EnvRequestRecord]) -> io::Result<()> {
        if records.is_empty() {
            return self.term.write_line("No environment requests found.");
        }

        if self.format == OutputFormat::Plain {
            for record in records {
                self.term.write_line(&format!(
                    "{}\t{}\t{}\t{}",
                    record.request_id, record.env_name, record.instance_type, record.ide_option
                ))?;
            }
            return Ok(());
        }

        let mut table = self.new_table();
        table.set_header(vec![
            Cell::new("Request ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Instance").add_attribute(Attribute::Bold),
            Cell::new("IDE").add_attribute(Attribute::Bold),
            Cell::new("Images").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
        ]);
        for record in records {
            table.add_row(vec![
                Cell::new(&record.request_id),
                Cell::new(&record.env_name),
                Cell::new(or_dash(&record.instance_type)),
                Cell::new(or_dash(&record.ide_option)),
                Cell::new(or_dash(&record.frameworks().join(", "))),
                Cell::new(record.created_at.as_deref().unwrap_or("-")),
            ]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_request_info(&self, record: &EnvRequestRecord) -> io::Result<()> {
        self.term.write_line(&self.style_heading(&record.env_name))?;

        let images = record.frameworks().join(", ");
        let rows = [
            ("Request ID", record.request_id.as_str()),
            ("Purpose", record.env_purpose.as_str()),
            ("Use Case", record.use_case.as_str()),
            ("Data Domain", record.data_domain.as_str()),
            ("Instance", record.instance_type.as_str()),
            ("IDE", record.ide_option.as_str()),
            ("Images", images.as_str()),
            ("Requested By", record.requested_by.as_deref().unwrap_or("")),
            ("Status", record.status.as_deref().unwrap_or("")),
            ("Created", record.created_at.as_deref().unwrap_or("")),
        ];

        if self.format == OutputFormat::Plain {
            for (label, value) in rows {
                self.term
                    .write_line(&format!("{label}: {}", or_dash(value)))?;
            }
            return Ok(());
        }

        let mut table = self.new_table();
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(or_dash(value)),
            ]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_health(&self, health: &ServiceHealth) -> io::Result<()> {
        let service = health.service.as_deref().unwrap_or("service");
        let line = format!("{service}: {}", health.status);
        if health.is_healthy() {
            self.success_line(&line)
        } else {
            self.error_line(&line)
        }
    }

    fn render_jupyter_status(&self, status: &JupyterStatus) -> io::Result<()> {
        let line = format!("Jupyter: {}", status.status);
        if status.jupyter_running {
            self.success_line(&line)?;
        } else {
            self.error_line(&line)?;
        }
        if let Some(url) = &status.url {
            self.term.write_line(&format!("  URL: {url}"))?;
        }
        if let Some(error) = &status.error {
            self.term.write_line(&format!("  Error: {error}"))?;
        }
        Ok(())
    }

    fn render_active_sessions(&self, active: &ActiveJupyterSessions) -> io::Result<()> {
        if active.sessions.is_empty() {
            return self.term.write_line("No active Jupyter sessions.");
        }

        if self.format == OutputFormat::Plain {
            for session in &active.sessions {
                self.term.write_line(&format!(
                    "{}\t{}\t{}\t{}",
                    session.token_preview,
                    session.request_id,
                    session.expires_in_minutes,
                    session.used_count
                ))?;
            }
            return Ok(());
        }

        let mut table = self.new_table();
        table.set_header(vec![
            Cell::new("Token").add_attribute(Attribute::Bold),
            Cell::new("Request ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Expires In").add_attribute(Attribute::Bold),
            Cell::new("Uses").add_attribute(Attribute::Bold),
            Cell::new("Last Access").add_attribute(Attribute::Bold),
        ]);
        for session in &active.sessions {
            table.add_row(vec![
                Cell::new(&session.token_preview),
                Cell::new(&session.request_id),
                Cell::new(or_dash(&session.env_name)),
                Cell::new(format!("{} min", session.expires_in_minutes)),
                Cell::new(session.used_count),
                Cell::new(session.last_accessed.as_deref().unwrap_or("-")),
            ]);
        }
        self.term.write_line(&table.to_string())?;
        if active.expired_cleaned > 0 {
            self.term.write_line(&format!(
                "{} expired token(s) cleaned up",
                active.expired_cleaned
            ))?;
        }
        Ok(())
    }

    fn render_jupyter_config(&self, config: &JupyterServiceConfig) -> io::Result<()> {
        let token = if config.token_configured { "yes" } else { "no" };
        self.term.write_line(&format!("Jupyter base URL: {}", config.base_url))?;
        self.term.write_line(&format!(
            "Default expiry: {} min",
            config.default_expiry_minutes
        ))?;
        self.term.write_line(&format!("Server token configured: {token}"))
    }

    fn render_revoked(&self, revoked: &TokenRevoked) -> io::Result<()> {
        let info = &revoked.revoked_token_info;
        let line = format!("Token revoked for request {}", info.request_id);
        if revoked.success {
            self.success_line(&line)?;
        } else {
            self.error_line(&revoked.message)?;
        }
        if !info.env_name.is_empty() {
            self.term.write_line(&format!("  Name: {}", info.env_name))?;
        }
        self.term
            .write_line(&format!("  Used: {}", if info.was_used { "yes" } else { "no" }))
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }
        table
    }

    fn success_line(&self, message: &str) -> io::Result<()> {
        let line = self.paint(Style::new().green().bold(), message);
        self.term.write_line(&line)
    }

    fn error_line(&self, message: &str) -> io::Result<()> {
        let line = self.paint(Style::new().red().bold(), message);
        self.term.write_line(&line)
    }

    fn style_heading(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.supports_color() {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        if self.format == OutputFormat::Plain {
            return false;
        }
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
