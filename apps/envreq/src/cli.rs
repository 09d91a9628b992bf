//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use envreq_types::{
    ColorChoice, EnvironmentRequestForm, FrameworkOption, FrameworkSelection, IdeOption,
    InstanceType,
};
use std::path::PathBuf;

/// envreq - request data-science environments from the provisioning service
#[derive(Parser)]
#[command(name = "envreq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Request data-science environments and Jupyter access")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the envreq log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Provisioning service base URL (overrides config and ENVREQ_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit an environment request from flags
    Submit(SubmitArgs),

    /// Fill in the environment request form interactively
    New,

    /// Generate a presigned Jupyter URL for an existing request
    #[command(alias = "jupyter")]
    JupyterUrl {
        /// Request ID returned by a previous submission
        request_id: String,

        /// Minutes until the URL expires
        #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
        expiry_minutes: Option<u32>,
    },

    /// Show a stored environment request
    #[command(alias = "info")]
    Show {
        /// Request ID
        request_id: String,
    },

    /// List stored environment requests
    #[command(alias = "ls")]
    List,

    /// Check that the provisioning service is up
    Health,

    /// Show whether the service's Jupyter server is running
    JupyterStatus,

    /// List presigned Jupyter tokens that are still live
    #[command(alias = "sessions")]
    ActiveSessions,

    /// Show the service's Jupyter settings
    JupyterConfig,

    /// Revoke a presigned Jupyter token before it expires
    Revoke {
        /// Token from the presigned URL's `token` query parameter
        token: String,
    },

    /// Drop expired presigned tokens on the service
    CleanupTokens,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Environment name (required)
    #[arg(long)]
    pub name: Option<String>,

    /// What the environment is for (required)
    #[arg(long)]
    pub purpose: Option<String>,

    #[arg(long)]
    pub use_case: Option<String>,

    #[arg(long)]
    pub data_domain: Option<String>,

    /// Compute size
    #[arg(long, value_enum, default_value_t = InstanceType::Small)]
    pub instance: InstanceType,

    /// IDE to provision; jupyter also generates an access URL
    #[arg(long, value_enum, default_value_t = IdeOption::Jupyter)]
    pub ide: IdeOption,

    /// Container image; repeat to select several, naming one twice deselects it
    #[arg(long = "image", value_enum, value_name = "IMAGE")]
    pub images: Vec<FrameworkOption>,

    /// Minutes until the Jupyter URL expires
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
    pub expiry_minutes: Option<u32>,
}

impl SubmitArgs {
    /// Missing name or purpose stay blank so the form check reports them
    pub fn into_form(self) -> EnvironmentRequestForm {
        EnvironmentRequestForm {
            env_name: self.name.unwrap_or_default(),
            env_purpose: self.purpose.unwrap_or_default(),
            use_case: self.use_case.unwrap_or_default(),
            data_domain: self.data_domain.unwrap_or_default(),
            instance_type: self.instance,
            ide_option: self.ide,
            frameworks: self.images.into_iter().collect::<FrameworkSelection>(),
        }
    }
}
