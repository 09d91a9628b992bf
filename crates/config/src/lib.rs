#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for envreq
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/envreq/config.toml)
//! - Environment variables
//! - CLI flags

pub mod constants;

use constants::{
    APP_DIR, CONFIG_FILE, CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_EXPIRY_MINUTES,
    DEFAULT_REQUESTED_BY, EXCHANGE_TIMEOUT_SECS, LOGS_SUBDIR, QUERY_TIMEOUT_SECS,
    SUBMIT_TIMEOUT_SECS,
};
use envreq_errors::{ConfigError, Error};
use envreq_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub jupyter: JupyterConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub default_output: OutputFormat,
    #[serde(default)]
    pub color: ColorChoice,
}

/// Where the provisioning service lives and who we say we are
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_requested_by")]
    pub requested_by: String,
}

/// Network configuration, all values in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout: u64,
    #[serde(default = "default_exchange_timeout")]
    pub exchange_timeout: u64,
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// Presigned Jupyter URL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JupyterConfig {
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: u32,
}

// Default implementations

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            requested_by: default_requested_by(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            submit_timeout: SUBMIT_TIMEOUT_SECS,
            exchange_timeout: EXCHANGE_TIMEOUT_SECS,
            query_timeout: QUERY_TIMEOUT_SECS,
            connect_timeout: CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Default for JupyterConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: DEFAULT_EXPIRY_MINUTES,
        }
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_requested_by() -> String {
    DEFAULT_REQUESTED_BY.to_string()
}

fn default_submit_timeout() -> u64 {
    SUBMIT_TIMEOUT_SECS
}

fn default_exchange_timeout() -> u64 {
    EXCHANGE_TIMEOUT_SECS
}

fn default_query_timeout() -> u64 {
    QUERY_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    CONNECT_TIMEOUT_SECS
}

fn default_expiry_minutes() -> u32 {
    DEFAULT_EXPIRY_MINUTES
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config file");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Merge with variables supplied by `lookup`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ENVREQ_BASE_URL") {
            self.service.base_url = url;
        }

        if let Some(who) = lookup("ENVREQ_REQUESTED_BY") {
            self.service.requested_by = who;
        }

        if let Some(output) = lookup("ENVREQ_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "ENVREQ_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        if let Some(color) = lookup("ENVREQ_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "ENVREQ_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        if let Some(secs) = lookup("ENVREQ_SUBMIT_TIMEOUT") {
            self.network.submit_timeout = parse_env("ENVREQ_SUBMIT_TIMEOUT", secs)?;
        }

        if let Some(secs) = lookup("ENVREQ_EXCHANGE_TIMEOUT") {
            self.network.exchange_timeout = parse_env("ENVREQ_EXCHANGE_TIMEOUT", secs)?;
        }

        if let Some(minutes) = lookup("ENVREQ_JUPYTER_EXPIRY") {
            self.jupyter.expiry_minutes = parse_env("ENVREQ_JUPYTER_EXPIRY", minutes)?;
        }

        Ok(())
    }

    /// Reject values the client cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error for an unparseable base URL, a zero timeout or a
    /// zero expiry.
    pub fn validate(&self) -> Result<(), Error> {
        self.base_url()?;

        for (field, value) in [
            ("network.submit_timeout", self.network.submit_timeout),
            ("network.exchange_timeout", self.network.exchange_timeout),
            ("network.query_timeout", self.network.query_timeout),
            ("network.connect_timeout", self.network.connect_timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                }
                .into());
            }
        }

        if self.jupyter.expiry_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jupyter.expiry_minutes".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Parsed service base URL
    ///
    /// # Errors
    ///
    /// Returns an error if `service.base_url` is not an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let invalid = || ConfigError::InvalidValue {
            field: "service.base_url".to_string(),
            value: self.service.base_url.clone(),
        };
        let url = Url::parse(&self.service.base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid().into());
        }
        Ok(url)
    }

    #[must_use]
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.network.submit_timeout)
    }

    #[must_use]
    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_secs(self.network.exchange_timeout)
    }

    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.network.query_timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.network.connect_timeout)
    }

    /// Directory for debug log files
    #[must_use]
    pub fn log_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join(LOGS_SUBDIR)
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: String) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_form() {
        let config = Config::default();
        assert_eq!(config.submit_timeout(), Duration::from_secs(10));
        assert_eq!(config.exchange_timeout(), Duration::from_secs(15));
        assert_eq!(config.jupyter.expiry_minutes, 30);
        assert_eq!(config.service.requested_by, "anonymous");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[service]\nbase_url = \"https://envs.internal\"\n").unwrap();
        assert_eq!(config.service.base_url, "https://envs.internal");
        assert_eq!(config.service.requested_by, "anonymous");
        assert_eq!(config.network.exchange_timeout, 15);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.service.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.network.submit_timeout = 0;
        assert!(config.validate().is_err());
    }
}
