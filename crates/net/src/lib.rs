#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for envreq
//!
//! This crate owns every HTTP exchange with the provisioning service. Each
//! call is bounded by its own deadline and observes a caller-supplied
//! cancellation token; nothing is retried.

mod api;
mod client;

pub use api::{
    active_jupyter_sessions, check_service_health, cleanup_expired_tokens, env_request_info,
    generate_jupyter_url, jupyter_config, jupyter_status, list_env_requests,
    revoke_jupyter_token, submit_env_request,
};
pub use client::{HttpReply, NetClient, NetConfig};
pub use tokio_util::sync::CancellationToken;

use envreq_errors::{Error, NetworkError};
use url::Url;

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}
