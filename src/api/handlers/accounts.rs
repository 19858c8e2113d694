//! Account, session, and user directory handlers.

use crate::api::{error::ApiError, extract::CurrentUser, state::AppState};
use crate::auth::{
    domain::{User, UserId},
    services::RegisterRequest,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full user payload returned by the directory and session endpoints.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserPayload {
    id: Uuid,
    code: String,
    full_name: String,
    email: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().into_inner(),
            code: user.code(),
            full_name: user.full_name().to_owned(),
            email: user.email().as_str().to_owned(),
            avatar_url: user.avatar_url().map(ToOwned::to_owned),
            created_at: user.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterBody {
    full_name: String,
    email: String,
    password: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    email: String,
    password: String,
}

/// Session payload handed back on login: the token the client replays
/// plus the account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionPayload {
    token: String,
    expires_at: DateTime<Utc>,
    user: UserPayload,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserPayload>), ApiError> {
    let mut request = RegisterRequest::new(body.full_name, body.email, body.password);
    if let Some(avatar_url) = body.avatar_url {
        request = request.with_avatar_url(avatar_url);
    }
    let user = state.accounts().register(request).await?;
    tracing::info!(user = %user.id(), "account registered");
    Ok((StatusCode::CREATED, Json(UserPayload::from(&user))))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionPayload>, ApiError> {
    let session = state.accounts().login(&body.email, &body.password).await?;
    tracing::info!(user = %session.user().id(), "session opened");
    Ok(Json(SessionPayload {
        token: session.token().as_str().to_owned(),
        expires_at: session.expires_at(),
        user: UserPayload::from(session.user()),
    }))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.accounts().logout(caller.token()).await?;
    tracing::info!(user = %caller.user().id(), "session closed");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn me(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<UserPayload>, ApiError> {
    let user = state.accounts().user(caller.user().id()).await?;
    Ok(Json(UserPayload::from(&user)))
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<Vec<UserPayload>>, ApiError> {
    let users = state.accounts().users().await?;
    Ok(Json(users.iter().map(UserPayload::from).collect()))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserPayload>, ApiError> {
    let user = state.accounts().user(UserId::from_uuid(id)).await?;
    Ok(Json(UserPayload::from(&user)))
}
