//! Wire types for the daemon HTTP contract
//!
//! Field names follow the daemon's camelCase JSON. Read models are lenient
//! (missing collections default to empty) since the daemon evolves faster
//! than this bridge.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Read models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPath {
    pub path: String,
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Deleted,
    /// Any status this bridge does not know about
    #[serde(other)]
    #[schemars(skip)]
    Other,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Deleted => "deleted",
            TaskStatus::Other => "other",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as reported by the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_form: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub name: String,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub members: Vec<MemberSummary>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub conflicts: Vec<Value>,
}

impl TeamSummary {
    pub fn member(&self, name: &str) -> Option<&MemberSummary> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Current liveness record of one member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatus {
    pub member_name: String,
    pub alive: bool,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub last_heartbeat_ms: u64,
    #[serde(default)]
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub team: TeamSummary,
    #[serde(default)]
    pub statuses: Vec<MemberStatus>,
}

impl TeamSnapshot {
    pub fn status_of(&self, member: &str) -> Option<&MemberStatus> {
        self.statuses.iter().find(|s| s.member_name == member)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub payload_json: Option<String>,
    #[serde(default)]
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub payload_json: String,
    #[serde(default)]
    pub created_at_ms: u64,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: String,
    pub lead_name: String,
    pub lead_agent_type: String,
    pub model: String,
    pub backend_type: String,
    pub cwd: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTeamRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnTeammateRequest {
    pub team: String,
    pub name: String,
    pub agent_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub backend_type: String,
    pub cwd: String,
    pub plan_mode_required: bool,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KillTeammateRequest {
    pub team: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub team: String,
    pub external_task_id: String,
    pub subject: String,
    pub description: String,
    pub active_form: String,
    pub status: TaskStatus,
}

/// Partial task update; only `Some` fields are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub team: String,
    pub external_task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Member name to assign; the daemon has no way to unassign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_json: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_blocks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_blocked_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadInboxRequest {
    pub team: String,
    pub member_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_daemon_json() {
        let snapshot: TeamSnapshot = serde_json::from_value(json!({
            "team": {
                "name": "proj",
                "description": "demo",
                "createdAt": 1,
                "archived": false,
                "members": [{
                    "name": "alice", "agentType": "general", "model": "m",
                    "cwd": "/tmp", "isActive": true, "color": null
                }],
                "tasks": [{"id": "3", "subject": "s", "status": "in_progress", "owner": null}],
                "conflicts": []
            },
            "statuses": [{
                "memberName": "alice", "alive": true, "state": "idle",
                "headline": null, "lastHeartbeatMs": 5, "lastError": null
            }]
        }))
        .unwrap();

        assert_eq!(snapshot.team.tasks[0].status, TaskStatus::InProgress);
        assert!(snapshot.team.member("alice").is_some());
        assert!(snapshot.status_of("alice").unwrap().alive);
        assert!(snapshot.status_of("bob").is_none());
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let task: Task =
            serde_json::from_value(json!({"id": "1", "subject": "s", "status": "blocked"}))
                .unwrap();
        assert_eq!(task.status, TaskStatus::Other);
    }

    #[test]
    fn test_update_request_only_sends_supplied_fields() {
        let req = UpdateTaskRequest {
            team: "proj".into(),
            external_task_id: "1".into(),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "team": "proj",
                "externalTaskId": "1",
                "status": "completed"
            })
        );
    }
}
