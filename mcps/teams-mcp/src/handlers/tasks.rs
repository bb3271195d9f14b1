//! Task handler implementations

use crate::daemon::types::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
use crate::error::{DaemonContext, ToolError, ToolResult};
use crate::params::{TaskCreateParams, TaskGetParams, TaskListParams, TaskUpdateParams};
use crate::session::Session;
use crate::task_ids::next_task_id;
use crate::types::TaskListResponse;

use super::{non_blank, require};

const UPDATE_PATH: &str = "/internal/tasks/update";

/// Create a pending task under the next free id
pub async fn task_create(session: &Session, params: TaskCreateParams) -> ToolResult<Task> {
    let team = require("team", &params.team)?;
    let subject = require("subject", &params.subject)?;
    let active_form = params.active_form.unwrap_or_default();

    let id = next_task_id(session.client(), &team).await;

    let request = CreateTaskRequest {
        team: team.clone(),
        external_task_id: id.clone(),
        subject: subject.clone(),
        description: params.description.clone(),
        active_form: active_form.clone(),
        status: TaskStatus::Pending,
    };

    session
        .client()
        .send("/internal/tasks/create", &request)
        .await
        .context(format!("failed to create task in team \"{}\"", team))?;

    tracing::info!(team = %team, task_id = %id, "task created");

    // Metadata is a second write; the task exists even if it fails
    let metadata = match params.metadata.filter(|m| !m.is_empty()) {
        Some(metadata) => {
            let merge = UpdateTaskRequest {
                team: team.clone(),
                external_task_id: id.clone(),
                metadata_json: Some(metadata.clone()),
                ..Default::default()
            };
            match session.client().send(UPDATE_PATH, &merge).await {
                Ok(_) => Some(metadata),
                Err(e) => {
                    tracing::warn!(team = %team, task_id = %id, error = %e, "metadata merge failed");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Task {
        id,
        subject,
        description: Some(params.description),
        active_form: Some(active_form).filter(|a| !a.is_empty()),
        status: TaskStatus::Pending,
        owner: None,
        metadata,
        blocks: Vec::new(),
        blocked_by: Vec::new(),
    })
}

/// Apply a partial update; only supplied fields are sent
pub async fn task_update(session: &Session, params: TaskUpdateParams) -> ToolResult<Task> {
    let team = require("team", &params.team)?;
    let task_id = require("task_id", &params.task_id)?;

    if params.status == Some(TaskStatus::Other) {
        return Err(ToolError::validation(
            "status must be one of pending, in_progress, completed, deleted",
        ));
    }

    let owner_name = match params.owner {
        Some(owner) => Some(non_blank(Some(owner)).ok_or_else(|| {
            ToolError::validation("owner must name a team member; an owner cannot be cleared")
        })?),
        None => None,
    };

    let request = UpdateTaskRequest {
        team: team.clone(),
        external_task_id: task_id.clone(),
        subject: params.subject,
        description: params.description,
        active_form: params.active_form,
        status: params.status,
        owner_name,
        metadata_json: params.metadata,
        add_blocks: clean_ids(params.add_blocks),
        add_blocked_by: clean_ids(params.add_blocked_by),
    };

    session
        .client()
        .send(UPDATE_PATH, &request)
        .await
        .context(format!("failed to update task {} in team \"{}\"", task_id, team))?;

    tracing::info!(team = %team, task_id = %task_id, "task updated");

    let reread = find_task(session, &team, &task_id).await.context(format!(
        "task {} was updated but could not be re-read",
        task_id
    ))?;

    match reread {
        Some(task) => Ok(task),
        // Deleted tasks drop out of the listing
        None if request.status == Some(TaskStatus::Deleted) => Ok(deleted_record(request)),
        None => Err(ToolError::not_found(format!(
            "task {} is no longer listed in team \"{}\"",
            task_id, team
        ))),
    }
}

pub async fn task_list(session: &Session, params: TaskListParams) -> ToolResult<TaskListResponse> {
    let team = require("team", &params.team)?;
    let tasks = list_tasks(session, &team).await?;

    Ok(TaskListResponse {
        team,
        total: tasks.len(),
        tasks,
    })
}

/// Linear scan over the team's tasks
pub async fn task_get(session: &Session, params: TaskGetParams) -> ToolResult<Task> {
    let team = require("team", &params.team)?;
    let task_id = require("task_id", &params.task_id)?;

    list_tasks(session, &team)
        .await?
        .into_iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| {
            ToolError::not_found(format!("task {} not found in team \"{}\"", task_id, team))
        })
}

async fn list_tasks(session: &Session, team: &str) -> ToolResult<Vec<Task>> {
    let snapshot = session
        .client()
        .snapshot(team)
        .await
        .context(format!("failed to list tasks of team \"{}\"", team))?;
    Ok(snapshot.team.tasks)
}

async fn find_task(
    session: &Session,
    team: &str,
    task_id: &str,
) -> crate::daemon::DaemonResult<Option<Task>> {
    let snapshot = session.client().snapshot(team).await?;
    Ok(snapshot.team.tasks.into_iter().find(|t| t.id == task_id))
}

fn clean_ids(ids: Option<Vec<String>>) -> Vec<String> {
    ids.unwrap_or_default()
        .into_iter()
        .filter_map(|id| non_blank(Some(id)))
        .collect()
}

/// Record for a task the update just deleted
fn deleted_record(request: UpdateTaskRequest) -> Task {
    Task {
        id: request.external_task_id,
        subject: request.subject.unwrap_or_default(),
        description: request.description,
        active_form: request.active_form,
        status: TaskStatus::Deleted,
        owner: request.owner_name,
        metadata: request.metadata_json,
        blocks: request.add_blocks,
        blocked_by: request.add_blocked_by,
    }
}
