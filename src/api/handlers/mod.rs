//! Route handlers, grouped by bounded context.

pub(crate) mod accounts;
pub(crate) mod attachments;
pub(crate) mod deliveries;
pub(crate) mod health;
pub(crate) mod projects;
pub(crate) mod tasks;

use super::{error::ApiError, state::AppState};
use crate::auth::{domain::UserId, services::AccountServiceError};
use crate::project::domain::Project;
use crate::workflow::domain::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Compact user embed carried inside project, task, and review payloads.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserSummary {
    id: Uuid,
    code: String,
    name: String,
    avatar: Option<String>,
}

/// Looked-up summaries keyed by user identifier.
pub(crate) type SummaryMap = HashMap<UserId, UserSummary>;

/// Resolves user summaries for the given identifiers.
///
/// Identifiers that no longer resolve to an account are silently dropped;
/// the payload then simply omits the embed.
pub(crate) async fn resolve_summaries(
    state: &AppState,
    ids: impl IntoIterator<Item = UserId>,
) -> Result<SummaryMap, ApiError> {
    let mut summaries = SummaryMap::new();
    for id in ids {
        if summaries.contains_key(&id) {
            continue;
        }
        match state.accounts().user(id).await {
            Ok(user) => {
                summaries.insert(
                    id,
                    UserSummary {
                        id: id.into_inner(),
                        code: user.code(),
                        name: user.full_name().to_owned(),
                        avatar: user.avatar_url().map(ToOwned::to_owned),
                    },
                );
            }
            Err(AccountServiceError::UserNotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(summaries)
}

/// Roster entry embed inside a project payload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MemberPayload {
    id: Uuid,
    user_id: Uuid,
    role: &'static str,
    user: Option<UserSummary>,
}

/// Project payload with its roster resolved.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProjectPayload {
    id: Uuid,
    name: String,
    description: Option<String>,
    status: &'static str,
    created_at: DateTime<Utc>,
    members: Vec<MemberPayload>,
}

impl ProjectPayload {
    pub(crate) async fn resolve(state: &AppState, project: &Project) -> Result<Self, ApiError> {
        let ids: Vec<UserId> = project.members().iter().map(|m| m.user_id()).collect();
        let summaries = resolve_summaries(state, ids).await?;
        Ok(Self::from_parts(project, &summaries))
    }

    pub(crate) fn from_parts(project: &Project, summaries: &SummaryMap) -> Self {
        Self {
            id: project.id().into_inner(),
            name: project.name().as_str().to_owned(),
            description: project.description().map(ToOwned::to_owned),
            status: project.status().as_str(),
            created_at: project.created_at(),
            members: project
                .members()
                .iter()
                .map(|member| MemberPayload {
                    id: member.id().into_inner(),
                    user_id: member.user_id().into_inner(),
                    role: member.role().as_str(),
                    user: summaries.get(&member.user_id()).cloned(),
                })
                .collect(),
        }
    }
}

/// Task payload with requester, executor, and reviewer embeds resolved.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskPayload {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: Option<String>,
    priority: &'static str,
    status: &'static str,
    due_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    requester: Option<UserSummary>,
    executor: Option<UserSummary>,
    reviewer: Option<UserSummary>,
}

impl TaskPayload {
    pub(crate) async fn resolve(state: &AppState, task: &Task) -> Result<Self, ApiError> {
        let ids = std::iter::once(task.requester_id())
            .chain(task.executor_id())
            .chain(task.reviewer_id());
        let summaries = resolve_summaries(state, ids).await?;
        Ok(Self::from_parts(task, &summaries))
    }

    pub(crate) fn from_parts(task: &Task, summaries: &SummaryMap) -> Self {
        Self {
            id: task.id().into_inner(),
            project_id: task.project_id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            priority: task.priority().as_str(),
            status: task.status().as_str(),
            due_at: task.due_at(),
            completed_at: task.completed_at(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            requester: summaries.get(&task.requester_id()).cloned(),
            executor: task
                .executor_id()
                .and_then(|id| summaries.get(&id).cloned()),
            reviewer: task
                .reviewer_id()
                .and_then(|id| summaries.get(&id).cloned()),
        }
    }
}
