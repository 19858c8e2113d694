//! Project catalogue handlers.

use super::ProjectPayload;
use crate::api::{error::ApiError, extract::CurrentUser, state::AppState};
use crate::auth::domain::UserId;
use crate::project::{
    domain::{ProjectId, ProjectRole},
    services::{CreateProjectRequest, MemberSpec, UpdateProjectRequest},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MemberBody {
    user_id: Uuid,
    role: String,
}

impl MemberBody {
    fn into_spec(self) -> MemberSpec {
        MemberSpec::new(UserId::from_uuid(self.user_id), self.role)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectBody {
    name: String,
    description: Option<String>,
    status: Option<String>,
    #[serde(default)]
    members: Vec<MemberBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProjectBody {
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
    members: Option<Vec<MemberBody>>,
}

pub(crate) async fn create_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<ProjectPayload>), ApiError> {
    let mut request = CreateProjectRequest::new(body.name);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(status) = body.status {
        request = request.with_status(status);
    }
    // The creator always lands on the roster as an organizer.
    let mut specs: Vec<MemberSpec> = body
        .members
        .into_iter()
        .map(MemberBody::into_spec)
        .collect();
    specs.push(MemberSpec::new(
        caller.user().id(),
        ProjectRole::Organizer.as_str(),
    ));
    request = request.with_members(specs);

    let project = state.catalog().create(request).await?;
    tracing::info!(project = %project.id(), "project created");
    let payload = ProjectPayload::resolve(&state, &project).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub(crate) async fn list_projects(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Vec<ProjectPayload>>, ApiError> {
    let projects = state.catalog().list_for_user(caller.user().id()).await?;
    let mut payloads = Vec::with_capacity(projects.len());
    for project in &projects {
        payloads.push(ProjectPayload::resolve(&state, project).await?);
    }
    Ok(Json(payloads))
}

pub(crate) async fn get_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectPayload>, ApiError> {
    let project = state
        .catalog()
        .get(ProjectId::from_uuid(id), caller.user().id())
        .await?;
    let payload = ProjectPayload::resolve(&state, &project).await?;
    Ok(Json(payload))
}

pub(crate) async fn update_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<ProjectPayload>, ApiError> {
    let project_id = ProjectId::from_uuid(id);
    require_organizer(&state, project_id, &caller).await?;

    let mut request = UpdateProjectRequest::new();
    if let Some(name) = body.name {
        request = request.with_name(name);
    }
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(status) = body.status {
        request = request.with_status(status);
    }
    if let Some(members) = body.members {
        request = request.with_members(members.into_iter().map(MemberBody::into_spec));
    }

    let project = state.catalog().update(project_id, request).await?;
    tracing::info!(project = %project.id(), "project updated");
    let payload = ProjectPayload::resolve(&state, &project).await?;
    Ok(Json(payload))
}

pub(crate) async fn delete_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let project_id = ProjectId::from_uuid(id);
    require_organizer(&state, project_id, &caller).await?;
    state.catalog().delete(project_id).await?;
    tracing::info!(project = %project_id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Mutating project routes are organizer-only; non-members keep seeing
/// 404 rather than 403 so existence does not leak.
async fn require_organizer(
    state: &AppState,
    project_id: ProjectId,
    caller: &CurrentUser,
) -> Result<(), ApiError> {
    let project = state.catalog().get(project_id, caller.user().id()).await?;
    if !project.has_role(caller.user().id(), ProjectRole::Organizer) {
        return Err(ApiError::Forbidden(format!(
            "user {} may not modify project {project_id}",
            caller.user().id()
        )));
    }
    Ok(())
}
