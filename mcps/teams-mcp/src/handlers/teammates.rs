//! Teammate handler implementations

use crate::daemon::types::{KillTeammateRequest, SpawnTeammateRequest};
use crate::discovery::{Backend, CapabilitySnapshot};
use crate::error::{DaemonContext, ToolError, ToolResult};
use crate::params::{
    CheckTeammateParams, KillTeammateParams, ProcessShutdownParams, SpawnTeammateParams,
};
use crate::protocol::{build_envelope, MessageDraft, MessageType};
use crate::session::Session;
use crate::types::{TeammateRemoved, TeammateSpawned, TeammateStatusView};

use super::messages::deliver;
use super::{non_blank, require, require_absolute, DEFAULT_AGENT_TYPE, LEAD_NAME};

pub const FORCE_KILL_REASON: &str = "force_kill";
pub const SHUTDOWN_APPROVED_REASON: &str = "shutdown_approved";

/// Pick the backend for a spawn, rejecting anything outside the enabled set.
///
/// With no backend enabled every spawn is rejected, whatever was requested.
pub fn select_backend(caps: &CapabilitySnapshot, requested: Option<&str>) -> ToolResult<Backend> {
    let Some(default) = caps.default_backend() else {
        return Err(ToolError::validation(
            "no execution backend is available in this environment; spawning is disabled",
        ));
    };

    let requested = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name,
        None => return Ok(default),
    };

    let enabled: Vec<&str> = caps.enabled_backends.iter().map(|b| b.as_str()).collect();
    match requested.parse::<Backend>() {
        Ok(backend) if caps.is_enabled(backend) => Ok(backend),
        Ok(backend) => Err(ToolError::validation(format!(
            "backend \"{}\" is not enabled; available: {}",
            backend,
            enabled.join(", ")
        ))),
        Err(e) => Err(ToolError::validation(format!(
            "{}; available: {}",
            e,
            enabled.join(", ")
        ))),
    }
}

/// Spawn a teammate and hand it its initial prompt
pub async fn spawn_teammate(
    session: &Session,
    params: SpawnTeammateParams,
) -> ToolResult<TeammateSpawned> {
    let team = require("team", &params.team)?;
    let name = require("name", &params.name)?;
    let prompt = require("prompt", &params.prompt)?;
    let cwd = require_absolute("cwd", &params.cwd)?;
    let backend = select_backend(session.capabilities(), params.backend.as_deref())?;

    let agent_type =
        non_blank(params.subagent_type).unwrap_or_else(|| DEFAULT_AGENT_TYPE.to_string());
    let model = non_blank(params.model);
    let plan_mode_required = params.plan_mode_required.unwrap_or(false);

    // Envelope is checked before the spawn, not after
    let envelope = build_envelope(
        &team,
        MessageDraft {
            message_type: MessageType::Message,
            sender: LEAD_NAME.to_string(),
            recipient: Some(name.clone()),
            summary: Some("Initial instructions".to_string()),
            content: Some(prompt.clone()),
            request_id: None,
            approve: None,
        },
    )?;

    let request = SpawnTeammateRequest {
        team: team.clone(),
        name: name.clone(),
        agent_type: agent_type.clone(),
        model: model.clone(),
        backend_type: backend.as_str().to_string(),
        cwd: cwd.clone(),
        plan_mode_required,
        prompt,
    };

    session
        .client()
        .send("/internal/teammates/spawn", &request)
        .await
        .context(format!("failed to spawn \"{}\" in team \"{}\"", name, team))?;

    tracing::info!(team = %team, name = %name, %backend, "teammate spawned");

    deliver(session, &envelope).await.context(format!(
        "teammate \"{}\" was spawned but its initial prompt could not be delivered",
        name
    ))?;

    Ok(TeammateSpawned {
        team,
        name,
        backend,
        agent_type,
        model,
        cwd,
        plan_mode_required,
        prompt_delivered: true,
    })
}

pub async fn force_kill_teammate(
    session: &Session,
    params: KillTeammateParams,
) -> ToolResult<TeammateRemoved> {
    let reason = non_blank(params.reason).unwrap_or_else(|| FORCE_KILL_REASON.to_string());
    remove_member(session, &params.team, &params.member, reason).await
}

/// Remove a teammate after its shutdown request was approved
pub async fn process_shutdown_approved(
    session: &Session,
    params: ProcessShutdownParams,
) -> ToolResult<TeammateRemoved> {
    remove_member(
        session,
        &params.team,
        &params.member,
        SHUTDOWN_APPROVED_REASON.to_string(),
    )
    .await
}

async fn remove_member(
    session: &Session,
    team: &str,
    member: &str,
    reason: String,
) -> ToolResult<TeammateRemoved> {
    let team = require("team", team)?;
    let member = require("member", member)?;

    session
        .client()
        .send(
            "/internal/teammates/kill",
            &KillTeammateRequest {
                team: team.clone(),
                name: member.clone(),
                reason: Some(reason.clone()),
            },
        )
        .await
        .context(format!("failed to remove \"{}\" from team \"{}\"", member, team))?;

    tracing::info!(team = %team, member = %member, reason = %reason, "teammate removed");

    Ok(TeammateRemoved {
        team,
        member,
        reason,
    })
}

/// Merge the status snapshot with the member's recent timeline
pub async fn check_teammate(
    session: &Session,
    params: CheckTeammateParams,
) -> ToolResult<TeammateStatusView> {
    let team = require("team", &params.team)?;
    let member = require("member", &params.member)?;
    let limit = params
        .timeline_limit
        .unwrap_or(session.config().teammates.timeline_limit)
        .max(1);

    let snapshot = session
        .client()
        .snapshot(&team)
        .await
        .context(format!("failed to read status of team \"{}\"", team))?;

    let summary = snapshot.team.member(&member);
    let status = snapshot.status_of(&member);
    if summary.is_none() && status.is_none() {
        return Err(ToolError::not_found(format!(
            "teammate \"{}\" not found in team \"{}\"",
            member, team
        )));
    }

    let timeline = session
        .client()
        .timeline(&team, &member, limit)
        .await
        .context(format!("failed to read timeline of \"{}\"", member))?;

    Ok(TeammateStatusView::merge(
        &team, &member, summary, status, timeline,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(enabled: &[Backend]) -> CapabilitySnapshot {
        CapabilitySnapshot {
            enabled_backends: enabled.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_backend_when_unspecified() {
        let caps = caps(&[Backend::Opencode, Backend::Claude]);
        assert_eq!(select_backend(&caps, None).unwrap(), Backend::Opencode);
        assert_eq!(select_backend(&caps, Some("  ")).unwrap(), Backend::Opencode);
    }

    #[test]
    fn test_disabled_backend_rejected() {
        let caps = caps(&[Backend::Claude]);
        let err = select_backend(&caps, Some("opencode")).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("not enabled")));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let caps = caps(&[Backend::Claude]);
        let err = select_backend(&caps, Some("codex")).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("unknown backend")));
    }

    #[test]
    fn test_empty_enabled_set_rejects_everything() {
        let caps = caps(&[]);
        for requested in [None, Some("claude"), Some("opencode")] {
            assert!(matches!(
                select_backend(&caps, requested),
                Err(ToolError::Validation(_))
            ));
        }
    }
}
