//! Configuration loading for teams-mcp
//!
//! Configuration is resolved once at startup, in priority order:
//! 1. Environment variables `NIGHTSHIFT_RUNTIME_URL` and `NIGHTSHIFT_TEAM_BACKENDS`
//! 2. TOML file at `TEAMS_MCP_CONFIG_PATH`, else `~/.nightshift/teams-mcp.toml`
//! 3. Default values
//!
//! Nothing below the server constructor reads the environment again.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

pub const RUNTIME_URL_ENV: &str = "NIGHTSHIFT_RUNTIME_URL";
pub const BACKENDS_ENV: &str = "NIGHTSHIFT_TEAM_BACKENDS";
pub const CONFIG_PATH_ENV: &str = "TEAMS_MCP_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub teammates: TeammateConfig,
    /// Executable search path captured at load time
    #[serde(skip)]
    pub search_path: Option<OsString>,
}

/// Daemon connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_daemon_url")]
    pub url: String,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

/// Capability discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Remote runtime base URL (sub-agent listing, opencode backend)
    #[serde(default)]
    pub runtime_url: Option<String>,
    /// Explicit backend allow-list; `None` means "whatever is installed"
    #[serde(default)]
    pub backends: Option<Vec<String>>,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

/// Teammate inspection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeammateConfig {
    /// Timeline entries fetched by `check_teammate` when the caller gives no limit
    #[serde(default = "default_timeline_limit")]
    pub timeline_limit: u32,
}

fn default_daemon_url() -> String {
    "http://127.0.0.1:19277".to_string()
}

fn default_request_timeout() -> u64 {
    20
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_timeline_limit() -> u32 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            discovery: DiscoveryConfig::default(),
            teammates: TeammateConfig::default(),
            search_path: None,
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: default_daemon_url(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            runtime_url: None,
            backends: None,
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl Default for TeammateConfig {
    fn default() -> Self {
        Self {
            timeline_limit: default_timeline_limit(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(
            std::env::var(RUNTIME_URL_ENV).ok(),
            std::env::var(BACKENDS_ENV).ok(),
        );
        config.search_path = std::env::var_os("PATH");

        Ok(config)
    }

    /// Overlay environment-derived values.
    ///
    /// The runtime URL doubles as the daemon base URL override: the daemon
    /// proxies the runtime's API on the same port.
    pub fn apply_env(&mut self, runtime_url: Option<String>, backends: Option<String>) {
        if let Some(url) = runtime_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.daemon.url = url.clone();
            self.discovery.runtime_url = Some(url);
        }

        if let Some(list) = backends {
            self.discovery.backends = Some(parse_backend_list(&list));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.daemon.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.probe_timeout_secs)
    }

    /// Configured runtime URL, ignoring blank values
    pub fn runtime_url(&self) -> Option<&str> {
        self.discovery
            .runtime_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".nightshift").join("teams-mcp.toml"))
    }
}

/// Split a comma-separated backend list, dropping blanks
pub fn parse_backend_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
