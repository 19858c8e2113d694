//! Task lifecycle handlers.

use super::TaskPayload;
use crate::api::{error::ApiError, extract::CurrentUser, state::AppState};
use crate::auth::domain::UserId;
use crate::project::domain::ProjectId;
use crate::workflow::{
    domain::TaskId,
    services::{CreateTaskRequest, UpdateTaskRequest},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskBody {
    project_id: Uuid,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    executor_id: Option<Uuid>,
    reviewer_id: Option<Uuid>,
    due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateTaskBody {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    executor_id: Option<Uuid>,
    reviewer_id: Option<Uuid>,
    due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    status: String,
}

pub(crate) async fn create_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskPayload>), ApiError> {
    let mut request = CreateTaskRequest::new(
        ProjectId::from_uuid(body.project_id),
        caller.user().id(),
        body.title,
    );
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(priority) = body.priority {
        request = request.with_priority(priority);
    }
    if let Some(executor_id) = body.executor_id {
        request = request.with_executor(UserId::from_uuid(executor_id));
    }
    if let Some(reviewer_id) = body.reviewer_id {
        request = request.with_reviewer(UserId::from_uuid(reviewer_id));
    }
    if let Some(due_at) = body.due_at {
        request = request.with_due_at(due_at);
    }

    let task = state.lifecycle().create_task(request).await?;
    tracing::info!(task = %task.id(), "task created");
    let payload = TaskPayload::resolve(&state, &task).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub(crate) async fn list_project_tasks(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TaskPayload>>, ApiError> {
    let tasks = state
        .lifecycle()
        .list_tasks(ProjectId::from_uuid(id), caller.user().id())
        .await?;
    let ids: Vec<UserId> = tasks
        .iter()
        .flat_map(|task| {
            std::iter::once(task.requester_id())
                .chain(task.executor_id())
                .chain(task.reviewer_id())
        })
        .collect();
    let summaries = super::resolve_summaries(&state, ids).await?;
    Ok(Json(
        tasks
            .iter()
            .map(|task| TaskPayload::from_parts(task, &summaries))
            .collect(),
    ))
}

pub(crate) async fn update_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<TaskPayload>, ApiError> {
    let mut request = UpdateTaskRequest::new();
    if let Some(title) = body.title {
        request = request.with_title(title);
    }
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(priority) = body.priority {
        request = request.with_priority(priority);
    }
    if let Some(executor_id) = body.executor_id {
        request = request.with_executor(UserId::from_uuid(executor_id));
    }
    if let Some(reviewer_id) = body.reviewer_id {
        request = request.with_reviewer(UserId::from_uuid(reviewer_id));
    }
    if let Some(due_at) = body.due_at {
        request = request.with_due_at(Some(due_at));
    }

    let task = state
        .lifecycle()
        .update_task(TaskId::from_uuid(id), caller.user().id(), request)
        .await?;
    tracing::info!(task = %task.id(), "task updated");
    let payload = TaskPayload::resolve(&state, &task).await?;
    Ok(Json(payload))
}

pub(crate) async fn change_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<TaskPayload>, ApiError> {
    let task = state
        .lifecycle()
        .change_status(TaskId::from_uuid(id), caller.user().id(), &body.status)
        .await?;
    tracing::info!(task = %task.id(), status = task.status().as_str(), "task moved");
    let payload = TaskPayload::resolve(&state, &task).await?;
    Ok(Json(payload))
}

pub(crate) async fn delete_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let task_id = TaskId::from_uuid(id);
    state
        .lifecycle()
        .delete_task(task_id, caller.user().id())
        .await?;
    tracing::info!(task = %task_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
