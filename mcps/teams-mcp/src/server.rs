//! MCP Server implementation for agent team orchestration
//!
//! This module defines the MCP server that exposes team, teammate, message
//! and task operations as tools. Handler implementations are in the handlers
//! module; every call is forwarded to the orchestration daemon.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::ToolResult;
use crate::handlers;
use crate::params::*;
use crate::session::Session;
use crate::tool_schema::{spawn_tool_descriptor, SPAWN_TOOL_NAME};

/// The main Teams MCP Server
#[derive(Clone)]
pub struct TeamsMcpServer {
    session: Session,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl TeamsMcpServer {
    /// Build the server; the spawn tool's schema is fitted to the session's
    /// capabilities here, before anything can list or call it.
    pub fn new(session: Session) -> Self {
        let mut tool_router = Self::tool_router();

        if let Some(route) = tool_router.map.get_mut(SPAWN_TOOL_NAME) {
            route.attr = spawn_tool_descriptor(&route.attr, session.capabilities());
        }

        Self {
            session,
            tool_router,
        }
    }

    // ========================================================================
    // Teams
    // ========================================================================

    #[tool(description = "Create a team led by the default team-lead agent")]
    async fn team_create(
        &self,
        Parameters(params): Parameters<TeamCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::team_create(&self.session, params).await)
    }

    #[tool(description = "Delete a team (fails while it still has active teammates)")]
    async fn team_delete(
        &self,
        Parameters(params): Parameters<TeamDeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::team_delete(&self.session, params).await)
    }

    #[tool(description = "List all teams with their members and tasks")]
    async fn team_list(&self) -> Result<CallToolResult, McpError> {
        json_success(handlers::team_list(&self.session).await)
    }

    #[tool(description = "Recent activity log of a team, newest first")]
    async fn team_activity(
        &self,
        Parameters(params): Parameters<TeamActivityParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::team_activity(&self.session, params).await)
    }

    #[tool(description = "Read a team's configuration: description, members and tasks")]
    async fn read_config(
        &self,
        Parameters(params): Parameters<ReadConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::read_config(&self.session, params).await)
    }

    // ========================================================================
    // Teammates
    // ========================================================================

    #[tool(description = "Spawn a new teammate agent in a team")]
    async fn spawn_teammate(
        &self,
        Parameters(params): Parameters<SpawnTeammateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::spawn_teammate(&self.session, params).await)
    }

    #[tool(description = "Remove a teammate immediately; its tasks keep their owner until reassigned")]
    async fn force_kill_teammate(
        &self,
        Parameters(params): Parameters<KillTeammateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::force_kill_teammate(&self.session, params).await)
    }

    #[tool(description = "Remove a teammate whose shutdown request was approved")]
    async fn process_shutdown_approved(
        &self,
        Parameters(params): Parameters<ProcessShutdownParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::process_shutdown_approved(&self.session, params).await)
    }

    #[tool(description = "Liveness, state, last error and recent timeline of a teammate")]
    async fn check_teammate(
        &self,
        Parameters(params): Parameters<CheckTeammateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::check_teammate(&self.session, params).await)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    #[tool(
        description = "Send a message, broadcast, shutdown request, or a shutdown / plan approval response (responses carry the request_id they answer)"
    )]
    async fn send_message(
        &self,
        Parameters(params): Parameters<SendMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::send_message(&self.session, params).await)
    }

    #[tool(description = "Mark a member's unread messages as read")]
    async fn read_inbox(
        &self,
        Parameters(params): Parameters<ReadInboxParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::read_inbox(&self.session, params).await)
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    #[tool(description = "Create a pending task; its id is allocated automatically")]
    async fn task_create(
        &self,
        Parameters(params): Parameters<TaskCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::task_create(&self.session, params).await)
    }

    #[tool(description = "Update status, owner, text, dependencies or metadata of a task")]
    async fn task_update(
        &self,
        Parameters(params): Parameters<TaskUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::task_update(&self.session, params).await)
    }

    #[tool(description = "List every task of a team")]
    async fn task_list(
        &self,
        Parameters(params): Parameters<TaskListParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::task_list(&self.session, params).await)
    }

    #[tool(description = "Fetch one task by id")]
    async fn task_get(
        &self,
        Parameters(params): Parameters<TaskGetParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(handlers::task_get(&self.session, params).await)
    }
}

// ============================================================================
// In-process access
// ============================================================================

impl TeamsMcpServer {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Tool descriptors exactly as a client would list them
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Invoke a tool by name with JSON arguments, without a transport
    pub async fn call_tool(&self, name: &str, params: Value) -> Result<CallToolResult, McpError> {
        match name {
            "team_create" => self.team_create(Parameters(decode(params)?)).await,
            "team_delete" => self.team_delete(Parameters(decode(params)?)).await,
            "team_list" => self.team_list().await,
            "team_activity" => self.team_activity(Parameters(decode(params)?)).await,
            "read_config" => self.read_config(Parameters(decode(params)?)).await,
            "spawn_teammate" => self.spawn_teammate(Parameters(decode(params)?)).await,
            "force_kill_teammate" => self.force_kill_teammate(Parameters(decode(params)?)).await,
            "process_shutdown_approved" => {
                self.process_shutdown_approved(Parameters(decode(params)?))
                    .await
            }
            "check_teammate" => self.check_teammate(Parameters(decode(params)?)).await,
            "send_message" => self.send_message(Parameters(decode(params)?)).await,
            "read_inbox" => self.read_inbox(Parameters(decode(params)?)).await,
            "task_create" => self.task_create(Parameters(decode(params)?)).await,
            "task_update" => self.task_update(Parameters(decode(params)?)).await,
            "task_list" => self.task_list(Parameters(decode(params)?)).await,
            "task_get" => self.task_get(Parameters(decode(params)?)).await,
            _ => Err(McpError::invalid_params(format!("unknown tool: {}", name), None)),
        }
    }

    fn instructions(&self) -> String {
        let caps = self.session.capabilities();
        let backends = if caps.enabled_backends.is_empty() {
            "none (spawn_teammate is unavailable)".to_string()
        } else {
            caps.enabled_backends
                .iter()
                .map(|b| b.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Agent team orchestration: create teams, spawn teammates, exchange messages \
             and track a shared task list. Shutdown and plan approval requests are \
             answered with send_message, passing back the request_id you received. \
             Enabled backends: {}.",
            backends
        )
    }
}

fn decode<T: DeserializeOwned>(params: Value) -> Result<T, McpError> {
    serde_json::from_value(params).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn json_success<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    let data = result.map_err(|e| {
        tracing::warn!(error = %e, "tool call failed");
        McpError::from(e)
    })?;
    let json = serde_json::to_string_pretty(&data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for TeamsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
