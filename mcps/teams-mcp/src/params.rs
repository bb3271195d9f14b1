//! Parameter definitions for teams-mcp tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::daemon::types::TaskStatus;
use crate::protocol::MessageType;

// ============================================================================
// Teams
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TeamCreateParams {
    #[schemars(description = "Team name (unique, filesystem-safe)")]
    pub team: String,
    #[schemars(description = "What the team is working on")]
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TeamDeleteParams {
    #[schemars(description = "Team name")]
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TeamActivityParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Maximum number of activity entries (default: 50)")]
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadConfigParams {
    #[schemars(description = "Team name")]
    pub team: String,
}

// ============================================================================
// Teammates
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpawnTeammateParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Teammate name (unique within the team)")]
    pub name: String,
    #[schemars(description = "Initial instructions for the teammate")]
    pub prompt: String,
    #[schemars(description = "Absolute working directory for the teammate")]
    pub cwd: String,
    #[schemars(description = "Model to run; omit for the backend default")]
    #[serde(default)]
    pub model: Option<String>,
    #[schemars(description = "Sub-agent type (default: general)")]
    #[serde(default)]
    pub subagent_type: Option<String>,
    #[schemars(description = "Require the teammate to get plan approval before acting")]
    #[serde(default)]
    pub plan_mode_required: Option<bool>,
    #[schemars(description = "Execution backend")]
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KillTeammateParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Teammate name")]
    pub member: String,
    #[schemars(description = "Reason recorded with the removal (default: force_kill)")]
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessShutdownParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Teammate whose shutdown was approved")]
    pub member: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckTeammateParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Teammate name")]
    pub member: String,
    #[schemars(description = "Number of recent timeline events to include")]
    #[serde(default)]
    pub timeline_limit: Option<u32>,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendMessageParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Message type")]
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[schemars(description = "Recipient member name (required for \"message\", ignored for \"broadcast\")")]
    #[serde(default)]
    pub recipient: Option<String>,
    #[schemars(description = "Message body")]
    #[serde(default)]
    pub content: Option<String>,
    #[schemars(description = "Short summary shown in previews")]
    #[serde(default)]
    pub summary: Option<String>,
    #[schemars(description = "Request id being answered (required for shutdown_response and plan_approval_response)")]
    #[serde(default)]
    pub request_id: Option<String>,
    #[schemars(description = "Approve (true) or deny (false) the referenced request")]
    #[serde(default)]
    pub approve: Option<bool>,
    #[schemars(description = "Sending member (default: team-lead)")]
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadInboxParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Member whose inbox is read")]
    pub member: String,
    #[schemars(description = "Accepted for compatibility; only unread messages are marked")]
    #[serde(default)]
    pub unread_only: Option<bool>,
    #[schemars(description = "Accepted for compatibility; messages are always marked as read")]
    #[serde(default)]
    pub mark_as_read: Option<bool>,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskCreateParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Short task title")]
    pub subject: String,
    #[schemars(description = "Full task description")]
    pub description: String,
    #[schemars(description = "Present-continuous label shown while in progress")]
    #[serde(default)]
    pub active_form: Option<String>,
    #[schemars(description = "Arbitrary key/value metadata")]
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskUpdateParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Task id")]
    pub task_id: String,
    #[schemars(description = "New status")]
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[schemars(description = "Member name to assign the task to (cannot be cleared once set)")]
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active_form: Option<String>,
    #[schemars(description = "Task ids this task blocks")]
    #[serde(default)]
    pub add_blocks: Option<Vec<String>>,
    #[schemars(description = "Task ids blocking this task")]
    #[serde(default)]
    pub add_blocked_by: Option<Vec<String>>,
    #[schemars(description = "Metadata keys to merge; a null value deletes the key")]
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskListParams {
    #[schemars(description = "Team name")]
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskGetParams {
    #[schemars(description = "Team name")]
    pub team: String,
    #[schemars(description = "Task id")]
    pub task_id: String,
}
