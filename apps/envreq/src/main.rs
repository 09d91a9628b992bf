//! envreq - environment request client
//!
//! CLI front end for the provisioning service. It builds the session and
//! the operations context, drives one command through the ops crate and
//! renders the result.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod prompt;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use envreq_config::Config;
use envreq_events::{AppEvent, EventEmitter, EventReceiver, GeneralEvent, JupyterEvent};
use envreq_net::CancellationToken;
use envreq_ops::{OperationResult, OpsContextBuilder, OpsCtx, SessionState};
use envreq_types::{ColorChoice, EnvironmentRequestForm, JupyterAccess, OutputFormat};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if json_mode {
            println!("{}", e.to_json());
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting envreq v{}", env!("CARGO_PKG_VERSION"));

    // Precedence: defaults, then file, then environment, then flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);
    apply_command_config(&mut config, &cli.command);
    config.validate()?;

    // The interactive form runs before any event traffic so prompts stay clean
    let form = match &cli.command {
        Commands::New => Some(prompt::collect_form()?),
        _ => None,
    };

    let (event_sender, event_receiver) = envreq_events::channel();
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let ctx = OpsContextBuilder::new()
        .with_config(config.clone())
        .with_event_sender(event_sender)
        .with_cancellation_token(cancel)
        .build()?;

    ctx.emit(AppEvent::General(GeneralEvent::ConfigurationLoaded {
        source: cli
            .global
            .config
            .as_ref()
            .map_or_else(|| "default".to_string(), |p| p.display().to_string()),
        base_url: ctx.net.base_url().to_string(),
    }));

    let renderer = OutputRenderer::new(config.general.default_output, config.general.color);
    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let quiet = config.general.default_output == OutputFormat::Json;
    let mut event_handler = EventHandler::new(colors_enabled, quiet);

    let result = execute_command_with_events(
        cli.command,
        form,
        ctx,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    form: Option<EnvironmentRequestForm>,
    ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, form, ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_event(message);
                }
                return result;
            }

            message = event_receiver.recv() => {
                match message {
                    Some(message) => event_handler.handle_event(message),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    form: Option<EnvironmentRequestForm>,
    ctx: OpsCtx,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Submit(args) => {
            let mut session = SessionState::with_form(args.into_form());
            submit_session(&ctx, &mut session).await
        }

        Commands::New => {
            let mut session = SessionState::with_form(form.unwrap_or_default());
            submit_session(&ctx, &mut session).await
        }

        Commands::JupyterUrl {
            request_id,
            expiry_minutes,
        } => {
            let mut session = SessionState::with_request_id(request_id.clone());
            let access = envreq_ops::fetch_jupyter_access(&ctx, &mut session, expiry_minutes)
                .await
                .map_err(|e| match operation_error(&session, e) {
                    // The id came from the caller; nothing new was created
                    CliError::Operation { notice, source, .. } => CliError::Operation {
                        notice,
                        request_id: None,
                        source,
                    },
                    other => other,
                })?;
            if let Some(expired) = withhold_if_expired(&ctx, &request_id, &access) {
                return Err(expired);
            }
            Ok(OperationResult::JupyterAccess(access))
        }

        Commands::Show { request_id } => {
            let record = envreq_ops::request_info(&ctx, &request_id).await?;
            Ok(OperationResult::RequestInfo(record))
        }

        Commands::List => {
            let records = envreq_ops::list_requests(&ctx).await?;
            Ok(OperationResult::RequestList(records))
        }

        Commands::Health => {
            let health = envreq_ops::service_health(&ctx).await?;
            Ok(OperationResult::ServiceHealth(health))
        }

        Commands::JupyterStatus => {
            let status = envreq_ops::jupyter_status(&ctx).await?;
            Ok(OperationResult::JupyterStatus(status))
        }

        Commands::ActiveSessions => {
            let active = envreq_ops::active_sessions(&ctx).await?;
            Ok(OperationResult::ActiveSessions(active))
        }

        Commands::JupyterConfig => {
            let config = envreq_ops::jupyter_config(&ctx).await?;
            Ok(OperationResult::JupyterConfig(config))
        }

        Commands::Revoke { token } => {
            let revoked = envreq_ops::revoke_token(&ctx, &token).await?;
            Ok(OperationResult::TokenRevoked(revoked))
        }

        Commands::CleanupTokens => {
            let cleanup = envreq_ops::cleanup_tokens(&ctx).await?;
            Ok(OperationResult::TokenCleanup(cleanup))
        }
    }
}

/// Submit the session's form and chain the Jupyter exchange when selected
async fn submit_session(
    ctx: &OpsCtx,
    session: &mut SessionState,
) -> Result<OperationResult, CliError> {
    let mut report = envreq_ops::submit(ctx, session)
        .await
        .map_err(|e| operation_error(session, e))?;

    let expired = report
        .jupyter
        .as_ref()
        .is_some_and(|access| withhold_if_expired(ctx, report.request_id(), access).is_some());
    if expired {
        report.jupyter = None;
    }
    Ok(OperationResult::Submitted(report))
}

/// Advisory expiry check before a URL is shown
fn withhold_if_expired(
    ctx: &OpsCtx,
    request_id: &str,
    access: &JupyterAccess,
) -> Option<CliError> {
    if !access.is_expired() {
        return None;
    }
    ctx.emit(AppEvent::Jupyter(JupyterEvent::UrlExpired {
        request_id: request_id.to_string(),
        expired_at: access.expires_at,
    }));
    Some(CliError::ExpiredUrl {
        request_id: request_id.to_string(),
        expired_at: access.expiry_display(),
    })
}

fn operation_error(session: &SessionState, source: envreq_errors::Error) -> CliError {
    match session.notice() {
        Some(notice) if notice.is_error() => CliError::Operation {
            notice: notice.message.clone(),
            request_id: session.request_id().map(str::to_string),
            source,
        },
        _ => CliError::Ops(source),
    }
}

/// Cancel in-flight calls on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::log_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "envreq-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,envreq=debug"),
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: keep stderr free of log lines
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(base_url) = &global.base_url {
        config.service.base_url.clone_from(base_url);
    }
}

/// A submit-time `--expiry-minutes` replaces the configured expiry for the chained exchange
fn apply_command_config(config: &mut Config, command: &Commands) {
    if let Commands::Submit(args) = command {
        if let Some(minutes) = args.expiry_minutes {
            config.jupyter.expiry_minutes = minutes;
        }
    }
}
