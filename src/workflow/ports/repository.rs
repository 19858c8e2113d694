//! Repository port for tasks, deliveries, and reviews.

use crate::project::domain::ProjectId;
use crate::workflow::domain::{Delivery, DeliveryDraft, DeliveryId, Review, ReviewId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Errors surfaced by workflow repository implementations.
#[derive(Debug, Error)]
pub enum WorkflowRepositoryError {
    /// A task with the same identifier already exists.
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
    /// No task exists with the given identifier.
    #[error("task {0} was not found")]
    TaskNotFound(TaskId),
    /// Concurrent submissions raced to the same delivery version.
    #[error("delivery version conflict for task {0}")]
    DeliveryVersionConflict(TaskId),
    /// The delivery already carries a review.
    #[error("delivery {0} has already been reviewed")]
    DuplicateReview(DeliveryId),
    /// Underlying storage failed.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps an arbitrary storage error as a persistence failure.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Persistence port for the workflow context.
///
/// Delivery submission and review recording are combined operations: the
/// task row is written in the same unit of work, so a crash can never
/// leave a delivery without its status change.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateTask`] when the
    /// identifier is already taken.
    async fn store_task(&self, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Updates an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::TaskNotFound`] when no task
    /// carries the identifier.
    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Deletes a task; its deliveries and reviews cascade.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::TaskNotFound`] when no task
    /// carries the identifier.
    async fn delete_task(&self, id: TaskId) -> WorkflowRepositoryResult<()>;

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>>;

    /// Lists the tasks of a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the listing
    /// fails.
    async fn list_tasks_for_project(
        &self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<Task>>;

    /// Persists a delivery draft, allocating the next version for its
    /// task, and saves the already-transitioned task in the same unit of
    /// work.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::TaskNotFound`] when the task row
    /// is gone and [`WorkflowRepositoryError::DeliveryVersionConflict`]
    /// when a concurrent submission took the version first.
    async fn store_delivery(
        &self,
        draft: DeliveryDraft,
        task: &Task,
    ) -> WorkflowRepositoryResult<Delivery>;

    /// Retrieves a delivery.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_delivery(&self, id: DeliveryId) -> WorkflowRepositoryResult<Option<Delivery>>;

    /// Lists the deliveries of a task, newest version first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the listing
    /// fails.
    async fn list_deliveries(&self, task_id: TaskId) -> WorkflowRepositoryResult<Vec<Delivery>>;

    /// Returns the highest delivery version recorded for a task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn latest_delivery_version(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Option<u32>>;

    /// Records a review and saves the already-transitioned task in the
    /// same unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateReview`] when the
    /// delivery already carries a review and
    /// [`WorkflowRepositoryError::TaskNotFound`] when the task row is
    /// gone.
    async fn store_review(&self, review: &Review, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Retrieves a review by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_review(&self, id: ReviewId) -> WorkflowRepositoryResult<Option<Review>>;

    /// Retrieves the review recorded for a delivery, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_review_for_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> WorkflowRepositoryResult<Option<Review>>;

    /// Lists the reviews recorded for any of the given deliveries.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::Persistence`] when the listing
    /// fails.
    async fn list_reviews_for_deliveries(
        &self,
        delivery_ids: &[DeliveryId],
    ) -> WorkflowRepositoryResult<Vec<Review>>;
}

#[async_trait]
impl<T: WorkflowRepository + ?Sized> WorkflowRepository for Arc<T> {
    async fn store_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        (**self).store_task(task).await
    }

    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        (**self).update_task(task).await
    }

    async fn delete_task(&self, id: TaskId) -> WorkflowRepositoryResult<()> {
        (**self).delete_task(id).await
    }

    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        (**self).find_task(id).await
    }

    async fn list_tasks_for_project(
        &self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<Task>> {
        (**self).list_tasks_for_project(project_id).await
    }

    async fn store_delivery(
        &self,
        draft: DeliveryDraft,
        task: &Task,
    ) -> WorkflowRepositoryResult<Delivery> {
        (**self).store_delivery(draft, task).await
    }

    async fn find_delivery(&self, id: DeliveryId) -> WorkflowRepositoryResult<Option<Delivery>> {
        (**self).find_delivery(id).await
    }

    async fn list_deliveries(&self, task_id: TaskId) -> WorkflowRepositoryResult<Vec<Delivery>> {
        (**self).list_deliveries(task_id).await
    }

    async fn latest_delivery_version(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Option<u32>> {
        (**self).latest_delivery_version(task_id).await
    }

    async fn store_review(&self, review: &Review, task: &Task) -> WorkflowRepositoryResult<()> {
        (**self).store_review(review, task).await
    }

    async fn find_review(&self, id: ReviewId) -> WorkflowRepositoryResult<Option<Review>> {
        (**self).find_review(id).await
    }

    async fn find_review_for_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> WorkflowRepositoryResult<Option<Review>> {
        (**self).find_review_for_delivery(delivery_id).await
    }

    async fn list_reviews_for_deliveries(
        &self,
        delivery_ids: &[DeliveryId],
    ) -> WorkflowRepositoryResult<Vec<Review>> {
        (**self).list_reviews_for_deliveries(delivery_ids).await
    }
}
