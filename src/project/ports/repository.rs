//! Repository port for project aggregates.

use crate::auth::domain::UserId;
use crate::project::domain::{Project, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Errors surfaced by project repository implementations.
#[derive(Debug, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("project {0} already exists")]
    DuplicateProject(ProjectId),
    /// No project exists with the given identifier.
    #[error("project {0} was not found")]
    ProjectNotFound(ProjectId),
    /// Underlying storage failed.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps an arbitrary storage error as a persistence failure.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Persistence port for project aggregates.
///
/// The roster travels with the aggregate: `store` and `update` write the
/// member list in the same unit of work as the project row.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project together with its roster.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the
    /// identifier is already taken.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Updates an existing project, replacing its roster wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::ProjectNotFound`] when no project
    /// carries the identifier.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Deletes a project; dependent rows cascade.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::ProjectNotFound`] when no project
    /// carries the identifier.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()>;

    /// Retrieves a project with its roster.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Lists the projects where the user appears on the roster, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the listing
    /// fails.
    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;
}

#[async_trait]
impl<T: ProjectRepository + ?Sized> ProjectRepository for Arc<T> {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        (**self).store(project).await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        (**self).update(project).await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        (**self).delete(id).await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        (**self).find_by_id(id).await
    }

    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        (**self).list_for_member(user_id).await
    }
}
