#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the envreq client
//!
//! This crate provides the environment request form, its option enums,
//! the JSON shapes exchanged with the provisioning service and the
//! presigned Jupyter access handed back to the user.

pub mod access;
pub mod api;
pub mod form;
pub mod request;
pub mod session;

// Re-export commonly used types
pub use access::{parse_expiry, parse_expiry_in, JupyterAccess};
pub use api::{
    ActiveJupyterSessions, EnvRequestCreated, EnvRequestPayload, JupyterServiceConfig,
    JupyterSessionInfo, JupyterStatus, JupyterUrlData, JupyterUrlEnvelope, RevokedTokenInfo,
    ServiceHealth, TokenCleanup, TokenRevoked,
};
pub use form::{
    EnvironmentRequestForm, FrameworkOption, FrameworkSelection, IdeOption, InstanceType,
};
pub use request::{EnvRequestRecord, EnvironmentRequestResult, RequestStatus};
pub use session::SessionPhase;

use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    #[default]
    Tty,
    Json,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
