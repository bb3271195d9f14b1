//! Team handler implementations

use crate::daemon::types::{ActivityEntry, CreateTeamRequest, DeleteTeamRequest, TeamSummary};
use crate::error::{DaemonContext, ToolError, ToolResult};
use crate::params::{ReadConfigParams, TeamActivityParams, TeamCreateParams, TeamDeleteParams};
use crate::session::Session;
use crate::types::{TeamCreated, TeamDeleted};

use super::{require, LEAD_AGENT_TYPE, LEAD_BACKEND, LEAD_MODEL, LEAD_NAME};

const DEFAULT_ACTIVITY_LIMIT: u32 = 50;

/// Create a team whose lead always has the fixed default identity
pub async fn team_create(session: &Session, params: TeamCreateParams) -> ToolResult<TeamCreated> {
    let team = require("team", &params.team)?;
    let description = params.description.unwrap_or_default();
    let cwd = project_cwd(session).await?;

    let request = CreateTeamRequest {
        name: team.clone(),
        description: description.clone(),
        lead_name: LEAD_NAME.to_string(),
        lead_agent_type: LEAD_AGENT_TYPE.to_string(),
        model: LEAD_MODEL.to_string(),
        backend_type: LEAD_BACKEND.to_string(),
        cwd: cwd.clone(),
    };

    session
        .client()
        .send("/internal/teams/create", &request)
        .await
        .context(format!("failed to create team \"{}\"", team))?;

    tracing::info!(team = %team, cwd = %cwd, "team created");

    Ok(TeamCreated {
        team,
        description,
        lead_name: request.lead_name,
        lead_agent_type: request.lead_agent_type,
        model: request.model,
        backend: request.backend_type,
        cwd,
    })
}

/// Delete a team; the daemon refuses while teammates are active
pub async fn team_delete(session: &Session, params: TeamDeleteParams) -> ToolResult<TeamDeleted> {
    let team = require("team", &params.team)?;

    session
        .client()
        .send(
            "/internal/teams/delete",
            &DeleteTeamRequest { name: team.clone() },
        )
        .await
        .context(format!("failed to delete team \"{}\"", team))?;

    tracing::info!(team = %team, "team deleted");
    Ok(TeamDeleted { team })
}

pub async fn team_list(session: &Session) -> ToolResult<Vec<TeamSummary>> {
    session.client().teams().await.context("failed to list teams")
}

pub async fn team_activity(
    session: &Session,
    params: TeamActivityParams,
) -> ToolResult<Vec<ActivityEntry>> {
    let team = require("team", &params.team)?;
    let limit = params.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).max(1);

    session
        .client()
        .activity(&team, limit)
        .await
        .context(format!("failed to read activity of team \"{}\"", team))
}

/// Team configuration: description, members and tasks
pub async fn read_config(session: &Session, params: ReadConfigParams) -> ToolResult<TeamSummary> {
    let team = require("team", &params.team)?;

    let snapshot = session
        .client()
        .snapshot(&team)
        .await
        .context(format!("failed to read config of team \"{}\"", team))?;

    Ok(snapshot.team)
}

/// Project directory reported by the daemon, else this process's cwd
async fn project_cwd(session: &Session) -> ToolResult<String> {
    match session.client().project_path().await {
        Ok(path) if !path.trim().is_empty() => return Ok(path),
        Ok(_) => tracing::warn!("daemon reported an empty project path"),
        Err(e) => tracing::warn!(error = %e, "project path unavailable, using process cwd"),
    }

    std::env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .map_err(|e| ToolError::validation(format!("cannot determine working directory: {}", e)))
}
