//! HTTP client with per-call deadlines and cooperative cancellation

use std::time::Duration;

use envreq_config::Config;
use envreq_errors::{Error, NetworkError};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub submit_timeout: Duration,
    pub exchange_timeout: Duration,
    pub query_timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            submit_timeout: Duration::from_secs(envreq_config::constants::SUBMIT_TIMEOUT_SECS),
            exchange_timeout: Duration::from_secs(envreq_config::constants::EXCHANGE_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(envreq_config::constants::QUERY_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(envreq_config::constants::CONNECT_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 4,
            user_agent: format!("envreq/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetConfig {
    /// Take the timeouts from the loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            submit_timeout: config.submit_timeout(),
            exchange_timeout: config.exchange_timeout(),
            query_timeout: config.query_timeout(),
            connect_timeout: config.connect_timeout(),
            ..Self::default()
        }
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx reply into a service error carrying the body verbatim.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Service` when the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(NetworkError::Service {
                status: self.status,
                body: self.body,
            }
            .into())
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Protocol` when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body)
            .map_err(|e| NetworkError::protocol(e.to_string()).into())
    }
}

/// HTTP client bound to one service base URL
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    base_url: Url,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(base_url: Url, config: NetConfig) -> Result<Self, Error> {
        // No overall reqwest timeout: every call is bounded by its own deadline
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build a client from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.base_url()?, NetConfig::from_config(config))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Resolve path segments against the base URL. Segments are percent-encoded,
    /// so a request id can never escape its path position.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request and read its body, bounded by `limit`.
    ///
    /// The deadline covers both the send and the body read. When it elapses
    /// the in-flight future is dropped and a timeout error is returned; when
    /// `cancel` fires first the call returns `Error::Cancelled`. No retries.
    ///
    /// # Errors
    ///
    /// Returns a timeout, cancellation or transport error. Non-2xx statuses
    /// are not errors at this level; see [`HttpReply::error_for_status`].
    pub async fn send_bounded(
        &self,
        request: RequestBuilder,
        url: &Url,
        limit: Duration,
        cancel: &CancellationToken,
    ) -> Result<HttpReply, Error> {
        let deadline = cancel.child_token();

        let call = async {
            let response = request
                .send()
                .await
                .map_err(|e| map_transport_error(&e, url, limit))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| map_transport_error(&e, url, limit))?;
            Ok::<_, Error>(HttpReply { status, body })
        };

        tokio::select! {
            biased;
            () = deadline.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(limit) => {
                deadline.cancel();
                Err(timeout_error(url, limit))
            }
            result = call => result,
        }
    }
}

fn timeout_error(url: &Url, limit: Duration) -> Error {
    NetworkError::Timeout {
        url: url.to_string(),
        timeout_secs: limit.as_secs(),
    }
    .into()
}

fn map_transport_error(error: &reqwest::Error, url: &Url, limit: Duration) -> Error {
    if error.is_timeout() {
        timeout_error(url, limit)
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string()).into()
    } else {
        NetworkError::RequestFailed(error.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> NetClient {
        NetClient::new(Url::parse(base).unwrap(), NetConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://localhost:5000");
        let url = client.endpoint(&["env-request"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/env-request");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://example.com/api/");
        let url = client
            .endpoint(&["generate-jupyter-url", "abc123"])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/generate-jupyter-url/abc123");
    }

    #[test]
    fn test_endpoint_encodes_request_id() {
        let client = client("http://localhost:5000");
        let url = client.endpoint(&["env-request", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/env-request/a%2Fb%20c");
    }

    #[test]
    fn test_reply_status_mapping() {
        let ok = HttpReply {
            status: 201,
            body: "{}".into(),
        };
        assert!(ok.error_for_status().is_ok());

        let bad = HttpReply {
            status: 400,
            body: "bad input".into(),
        };
        let err = bad.error_for_status().unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::Service { status: 400, ref body }) if body == "bad input"
        ));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let client = client("http://127.0.0.1:9");
        let url = client.endpoint(&["health"]).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client
            .send_bounded(client.request(Method::GET, url.clone()), &url, Duration::from_secs(5), &cancel)
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
