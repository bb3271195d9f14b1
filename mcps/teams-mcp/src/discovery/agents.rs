//! Sub-agent discovery against the remote runtime

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::ProbeResult;
use crate::daemon::DaemonClient;

/// Runtime-internal agents that must never be offered as teammate types
pub const RESERVED_AGENT_NAMES: &[&str] = &["build", "plan", "title", "summary", "compaction"];

/// A sub-agent type a teammate can be spawned as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAgent {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// `GET {runtime_url}/agent` and keep the usable entries
pub async fn probe_subagents(runtime_url: &str, timeout: Duration) -> ProbeResult<Vec<SubAgent>> {
    let client = DaemonClient::new(runtime_url, timeout).map_err(|e| {
        crate::daemon::DaemonError::Transport {
            path: "/agent".to_string(),
            reason: e.to_string(),
        }
    })?;
    let value = client.get("/agent").await?;
    parse_subagents(value)
}

/// Drop reserved names and entries lacking a name or description
pub fn parse_subagents(value: Value) -> ProbeResult<Vec<SubAgent>> {
    let raw: Vec<RawAgent> = serde_json::from_value(value)?;

    Ok(raw
        .into_iter()
        .filter_map(|agent| {
            let name = agent.name?.trim().to_string();
            let description = agent.description?.trim().to_string();
            if name.is_empty() || description.is_empty() {
                return None;
            }
            if RESERVED_AGENT_NAMES.contains(&name.as_str()) {
                return None;
            }
            Some(SubAgent { name, description })
        })
        .collect())
}
