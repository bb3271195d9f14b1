//! Long-lived state shared by every tool call

use std::sync::Arc;

use crate::config::Config;
use crate::daemon::{ClientBuildError, DaemonClient};
use crate::discovery::CapabilitySnapshot;

/// Daemon client plus the immutable configuration and capability snapshot
#[derive(Debug, Clone)]
pub struct Session {
    client: DaemonClient,
    config: Arc<Config>,
    capabilities: Arc<CapabilitySnapshot>,
}

impl Session {
    pub fn new(config: Config, capabilities: CapabilitySnapshot) -> Result<Self, ClientBuildError> {
        let client = DaemonClient::new(&config.daemon.url, config.request_timeout())?;

        Ok(Self {
            client,
            config: Arc::new(config),
            capabilities: Arc::new(capabilities),
        })
    }

    pub fn client(&self) -> &DaemonClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilitySnapshot {
        &self.capabilities
    }
}
