//! Operations context for dependency injection

use envreq_config::Config;
use envreq_errors::Error;
use envreq_events::{EventEmitter, EventSender};
use envreq_net::{CancellationToken, NetClient};

/// Operations context providing access to the service client and settings
pub struct OpsCtx {
    /// Network client bound to the service base URL
    pub net: NetClient,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Loaded configuration
    pub config: Config,
    /// Cancelled on user interrupt; every network call observes it
    pub cancel: CancellationToken,
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    /// Value sent as `requested_by` with every submission
    #[must_use]
    pub fn requested_by(&self) -> &str {
        &self.config.service.requested_by
    }

    /// Default `expiry_minutes` for Jupyter URLs
    #[must_use]
    pub fn expiry_minutes(&self) -> u32 {
        self.config.jupyter.expiry_minutes
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    tx: Option<EventSender>,
    config: Option<Config>,
    cancel: Option<CancellationToken>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            net: None,
            tx: None,
            config: None,
            cancel: None,
        }
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Share a cancellation token with the caller (e.g. a Ctrl-C handler)
    #[must_use]
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the context
    ///
    /// The network client is derived from the configuration when not set
    /// explicitly; a fresh token is used when none was shared.
    ///
    /// # Errors
    ///
    /// Returns an error if the event sender or configuration is missing, or
    /// the network client cannot be built from the configuration.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("missing component: event_sender"))?;

        let config = self
            .config
            .ok_or_else(|| Error::internal("missing component: config"))?;

        let net = match self.net {
            Some(net) => net,
            None => NetClient::from_config(&config)?,
        };

        Ok(OpsCtx {
            net,
            tx,
            config,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_event_sender() {
        let result = OpsContextBuilder::new()
            .with_config(Config::default())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_derives_net_from_config() {
        let (tx, _rx) = envreq_events::channel();
        let ctx = OpsContextBuilder::new()
            .with_config(Config::default())
            .with_event_sender(tx)
            .build()
            .unwrap();

        assert_eq!(ctx.net.base_url().as_str(), "http://localhost:5000/");
        assert_eq!(ctx.requested_by(), "anonymous");
        assert_eq!(ctx.expiry_minutes(), 30);
        assert!(!ctx.cancel.is_cancelled());
    }
}
