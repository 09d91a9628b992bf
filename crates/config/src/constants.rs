//! Built-in defaults for envreq
//!
//! The timeouts mirror what the provisioning service's own web form uses.

pub const APP_DIR: &str = "envreq";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOGS_SUBDIR: &str = "logs";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUESTED_BY: &str = "anonymous";

pub const SUBMIT_TIMEOUT_SECS: u64 = 10;
pub const EXCHANGE_TIMEOUT_SECS: u64 = 15;
pub const QUERY_TIMEOUT_SECS: u64 = 10;
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_EXPIRY_MINUTES: u32 = 30;
