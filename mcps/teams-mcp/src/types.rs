//! Tool response types

use serde::Serialize;

use crate::daemon::types::{MemberStatus, MemberSummary, Task, TimelineEntry};
use crate::discovery::Backend;
use crate::protocol::MessageType;

#[derive(Debug, Clone, Serialize)]
pub struct TeamCreated {
    pub team: String,
    pub description: String,
    pub lead_name: String,
    pub lead_agent_type: String,
    pub model: String,
    pub backend: String,
    pub cwd: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDeleted {
    pub team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeammateSpawned {
    pub team: String,
    pub name: String,
    pub backend: Backend,
    pub agent_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub cwd: String,
    pub plan_mode_required: bool,
    pub prompt_delivered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeammateRemoved {
    pub team: String,
    pub member: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageSent {
    pub team: String,
    pub message_type: MessageType,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxRead {
    pub team: String,
    pub member: String,
    pub marked_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    pub team: String,
    pub total: usize,
    pub tasks: Vec<Task>,
}

/// Unified liveness and error view of one teammate
#[derive(Debug, Clone, Serialize)]
pub struct TeammateStatusView {
    pub team: String,
    pub member: String,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    pub timeline: Vec<TimelineEntry>,
}

impl TeammateStatusView {
    /// Merge a member's roster entry, status record and recent timeline.
    ///
    /// Liveness comes from the status record only; a member without one is
    /// reported as not alive. Without an explicit last error, the most recent
    /// timeline headline stands in as the error summary.
    pub fn merge(
        team: &str,
        member: &str,
        summary: Option<&MemberSummary>,
        status: Option<&MemberStatus>,
        timeline: Vec<TimelineEntry>,
    ) -> Self {
        let error_summary = status
            .and_then(|s| s.last_error.clone())
            .filter(|e| !e.trim().is_empty())
            .or_else(|| {
                timeline
                    .iter()
                    .find_map(|entry| entry.headline.clone().filter(|h| !h.trim().is_empty()))
            });

        Self {
            team: team.to_string(),
            member: member.to_string(),
            alive: status.map(|s| s.alive).unwrap_or(false),
            state: status.map(|s| s.state.clone()).filter(|s| !s.is_empty()),
            headline: status.and_then(|s| s.headline.clone()),
            last_heartbeat_ms: status.map(|s| s.last_heartbeat_ms),
            error_summary,
            agent_type: summary.map(|m| m.agent_type.clone()),
            model: summary.map(|m| m.model.clone()),
            cwd: summary.map(|m| m.cwd.clone()),
            timeline,
        }
    }
}
