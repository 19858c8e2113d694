//! Service-error to HTTP response conversion.

use crate::attachment::services::AttachmentLibraryError;
use crate::auth::{ports::AuthRepositoryError, services::AccountServiceError};
use crate::project::{ports::ProjectRepositoryError, services::ProjectCatalogError};
use crate::workflow::{ports::WorkflowRepositoryError, services::TaskLifecycleError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body carried by every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Stable machine-readable error code.
    pub code: String,
}

/// Errors surfaced by the REST layer.
///
/// Each variant maps to one HTTP status code; the message travels in the
/// response body. Service errors convert through the `From` impls below
/// so handlers can lean on `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or a field failed validation.
    #[error("{0}")]
    Validation(String),
    /// The resource does not exist, or the caller may not see it.
    #[error("{0}")]
    NotFound(String),
    /// The caller is authenticated but the action is not permitted.
    #[error("{0}")]
    Forbidden(String),
    /// The bearer token is missing, malformed, expired, or revoked.
    #[error("{0}")]
    Unauthorized(String),
    /// The request conflicts with current state.
    #[error("{0}")]
    Conflict(String),
    /// The request body did not parse as the expected shape.
    #[error("{0}")]
    BadRequest(String),
    /// Persistence or another internal concern failed.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// The standard response for a missing or rejected bearer token.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::Unauthorized("invalid or expired access token".to_owned())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Unauthorized(_) => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        let body = ErrorBody {
            message: self.to_string(),
            code: self.code().to_owned(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::Domain(inner) => Self::Validation(inner.to_string()),
            AccountServiceError::Repository(inner) => match inner {
                AuthRepositoryError::DuplicateEmail(_) => Self::Validation(inner.to_string()),
                AuthRepositoryError::DuplicateUser(_) | AuthRepositoryError::DuplicateToken => {
                    Self::Conflict(inner.to_string())
                }
                AuthRepositoryError::UserNotFound(_) => Self::NotFound(inner.to_string()),
                AuthRepositoryError::Persistence(_) => Self::Internal(inner.to_string()),
            },
            AccountServiceError::InvalidCredentials | AccountServiceError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AccountServiceError::UserNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<ProjectCatalogError> for ApiError {
    fn from(err: ProjectCatalogError) -> Self {
        match err {
            ProjectCatalogError::Domain(_)
            | ProjectCatalogError::InvalidStatus(_)
            | ProjectCatalogError::InvalidRole(_) => Self::Validation(err.to_string()),
            ProjectCatalogError::Repository(inner) => match inner {
                ProjectRepositoryError::DuplicateProject(_) => Self::Conflict(inner.to_string()),
                ProjectRepositoryError::ProjectNotFound(_) => Self::NotFound(inner.to_string()),
                ProjectRepositoryError::Persistence(_) => Self::Internal(inner.to_string()),
            },
            ProjectCatalogError::Accounts(inner) => Self::Internal(inner.to_string()),
            ProjectCatalogError::ProjectNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(_)
            | TaskLifecycleError::InvalidStatus(_)
            | TaskLifecycleError::InvalidPriority(_)
            | TaskLifecycleError::InvalidVerdict(_) => Self::Validation(err.to_string()),
            TaskLifecycleError::Repository(inner) => match inner {
                WorkflowRepositoryError::DeliveryVersionConflict(_)
                | WorkflowRepositoryError::DuplicateReview(_)
                | WorkflowRepositoryError::DuplicateTask(_) => Self::Conflict(inner.to_string()),
                WorkflowRepositoryError::TaskNotFound(_) => Self::NotFound(inner.to_string()),
                WorkflowRepositoryError::Persistence(_) => Self::Internal(inner.to_string()),
            },
            TaskLifecycleError::Projects(inner) => Self::Internal(inner.to_string()),
            TaskLifecycleError::ProjectNotFound(_)
            | TaskLifecycleError::TaskNotFound(_)
            | TaskLifecycleError::DeliveryNotFound(_) => Self::NotFound(err.to_string()),
            TaskLifecycleError::NotAProjectMember { .. }
            | TaskLifecycleError::RoleDenied { .. } => Self::Forbidden(err.to_string()),
            TaskLifecycleError::StaleDelivery { .. } | TaskLifecycleError::AlreadyReviewed(_) => {
                Self::Conflict(err.to_string())
            }
        }
    }
}

impl From<AttachmentLibraryError> for ApiError {
    fn from(err: AttachmentLibraryError) -> Self {
        match err {
            AttachmentLibraryError::Domain(_)
            | AttachmentLibraryError::InvalidContext(_)
            | AttachmentLibraryError::InvalidResourceType(_) => Self::Validation(err.to_string()),
            AttachmentLibraryError::Repository(_)
            | AttachmentLibraryError::Workflow(_)
            | AttachmentLibraryError::Projects(_) => Self::Internal(err.to_string()),
            AttachmentLibraryError::ParentNotFound { .. }
            | AttachmentLibraryError::AttachmentNotFound(_)
            | AttachmentLibraryError::TaskNotFound(_) => Self::NotFound(err.to_string()),
            AttachmentLibraryError::NotAProjectMember(_)
            | AttachmentLibraryError::RemovalDenied(_) => Self::Forbidden(err.to_string()),
        }
    }
}
