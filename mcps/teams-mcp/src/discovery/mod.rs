//! Capability discovery
//!
//! Runs once at startup and produces an immutable [`CapabilitySnapshot`]:
//! which backends are installed and enabled, which models each offers, and
//! which sub-agent types the remote runtime exposes.
//!
//! Every probe is an explicit fallible operation returning [`ProbeResult`].
//! Failures are converted to empty defaults in exactly one place,
//! [`degrade`], because the server must stay usable with zero backends.

pub mod agents;
pub mod backends;
pub mod executables;
pub mod models;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::daemon::DaemonError;

pub use agents::SubAgent;

/// Execution runtime a teammate runs under
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Claude,
    Opencode,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Claude, Backend::Opencode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Claude => "claude",
            Backend::Opencode => "opencode",
        }
    }

    /// Name of the executable looked up on the search path
    pub fn executable_name(&self) -> &'static str {
        self.as_str()
    }

    /// Whether this backend also needs the remote runtime
    pub fn needs_runtime(&self) -> bool {
        matches!(self, Backend::Opencode)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(Backend::Claude),
            "opencode" => Ok(Backend::Opencode),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

/// Failure of a single discovery probe
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{program} exited with code {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("remote runtime query failed: {0}")]
    Runtime(#[from] DaemonError),

    #[error("unexpected remote runtime response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ProbeResult<T> = Result<T, ProbeError>;

/// Convert a failed probe into its documented default, logging the cause
pub fn degrade<T: Default>(probe: &str, result: ProbeResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(probe, error = %e, "capability probe failed, using empty result");
            T::default()
        }
    }
}

/// What this environment can actually run. Computed once, never mutated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapabilitySnapshot {
    /// Backends a spawn may target, in preference order
    pub enabled_backends: Vec<Backend>,
    /// Executables found on the search path
    pub executables: BTreeMap<Backend, PathBuf>,
    /// Model names reported by each installed backend
    pub models: BTreeMap<Backend, Vec<String>>,
    /// Sub-agent types offered by the remote runtime
    pub subagents: Vec<SubAgent>,
    pub runtime_url_configured: bool,
}

impl CapabilitySnapshot {
    pub fn is_enabled(&self, backend: Backend) -> bool {
        self.enabled_backends.contains(&backend)
    }

    pub fn has_executable(&self, backend: Backend) -> bool {
        self.executables.contains_key(&backend)
    }

    pub fn default_backend(&self) -> Option<Backend> {
        self.enabled_backends.first().copied()
    }

    pub fn models_for(&self, backend: Backend) -> &[String] {
        self.models.get(&backend).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Probe the environment described by `config`.
///
/// Never fails; each probe degrades to an empty result on its own.
pub async fn discover(config: &Config) -> CapabilitySnapshot {
    let runtime_url = config.runtime_url();

    let mut executables = BTreeMap::new();
    for backend in Backend::ALL {
        if let Some(path) =
            executables::find_executable(backend.executable_name(), config.search_path.as_deref())
        {
            tracing::debug!(%backend, path = %path.display(), "found backend executable");
            executables.insert(backend, path);
        }
    }

    let mut models = BTreeMap::new();
    for (backend, path) in &executables {
        let probe = models::probe_models(path, config.probe_timeout()).await;
        models.insert(*backend, degrade("models", probe));
    }

    let subagents = match runtime_url {
        Some(url) => degrade(
            "subagents",
            agents::probe_subagents(url, config.request_timeout()).await,
        ),
        None => Vec::new(),
    };

    let enabled_backends = backends::resolve_enabled_backends(
        config.discovery.backends.as_deref(),
        &executables,
        runtime_url.is_some(),
    );

    let snapshot = CapabilitySnapshot {
        enabled_backends,
        executables,
        models,
        subagents,
        runtime_url_configured: runtime_url.is_some(),
    };

    tracing::info!(
        enabled = ?snapshot.enabled_backends,
        subagents = snapshot.subagents.len(),
        "capability discovery finished"
    );

    snapshot
}
