//! In-memory repository for tasks, deliveries, and reviews.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::workflow::{
    domain::{Delivery, DeliveryDraft, DeliveryId, Review, ReviewId, Task, TaskId},
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};

/// Thread-safe in-memory workflow repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    state: Arc<RwLock<InMemoryWorkflowState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkflowState {
    tasks: HashMap<TaskId, Task>,
    deliveries: HashMap<DeliveryId, Delivery>,
    deliveries_by_task: HashMap<TaskId, Vec<DeliveryId>>,
    reviews_by_delivery: HashMap<DeliveryId, Review>,
}

impl InMemoryWorkflowState {
    fn highest_version(&self, task_id: TaskId) -> Option<u32> {
        self.deliveries_by_task
            .get(&task_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.deliveries.get(id))
            .map(Delivery::version)
            .max()
    }

    /// Drops a task's deliveries and their reviews, mirroring the
    /// database cascade.
    fn cascade_delete_task(&mut self, task_id: TaskId) {
        let delivery_ids = self.deliveries_by_task.remove(&task_id).unwrap_or_default();
        for delivery_id in delivery_ids {
            self.deliveries.remove(&delivery_id);
            self.reviews_by_delivery.remove(&delivery_id);
        }
    }
}

impl InMemoryWorkflowRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock into the persistence error variant.
fn poisoned(err: impl std::fmt::Display) -> WorkflowRepositoryError {
    WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn store_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::TaskNotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(WorkflowRepositoryError::TaskNotFound(id));
        }
        state.cascade_delete_task(id);
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_tasks_for_project(
        &self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(tasks)
    }

    async fn store_delivery(
        &self,
        draft: DeliveryDraft,
        task: &Task,
    ) -> WorkflowRepositoryResult<Delivery> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::TaskNotFound(task.id()));
        }

        let version = state.highest_version(draft.task_id()).unwrap_or(0) + 1;
        let delivery = draft.into_delivery(version);

        state
            .deliveries_by_task
            .entry(delivery.task_id())
            .or_default()
            .push(delivery.id());
        state.deliveries.insert(delivery.id(), delivery.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(delivery)
    }

    async fn find_delivery(&self, id: DeliveryId) -> WorkflowRepositoryResult<Option<Delivery>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.deliveries.get(&id).cloned())
    }

    async fn list_deliveries(&self, task_id: TaskId) -> WorkflowRepositoryResult<Vec<Delivery>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut deliveries: Vec<Delivery> = state
            .deliveries_by_task
            .get(&task_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.deliveries.get(id))
            .cloned()
            .collect();
        deliveries.sort_by(|a, b| b.version().cmp(&a.version()));
        Ok(deliveries)
    }

    async fn latest_delivery_version(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Option<u32>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.highest_version(task_id))
    }

    async fn store_review(&self, review: &Review, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::TaskNotFound(task.id()));
        }
        if state.reviews_by_delivery.contains_key(&review.delivery_id()) {
            return Err(WorkflowRepositoryError::DuplicateReview(
                review.delivery_id(),
            ));
        }

        state
            .reviews_by_delivery
            .insert(review.delivery_id(), review.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_review(&self, id: ReviewId) -> WorkflowRepositoryResult<Option<Review>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .reviews_by_delivery
            .values()
            .find(|review| review.id() == id)
            .cloned())
    }

    async fn find_review_for_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> WorkflowRepositoryResult<Option<Review>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.reviews_by_delivery.get(&delivery_id).cloned())
    }

    async fn list_reviews_for_deliveries(
        &self,
        delivery_ids: &[DeliveryId],
    ) -> WorkflowRepositoryResult<Vec<Review>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(delivery_ids
            .iter()
            .filter_map(|id| state.reviews_by_delivery.get(id))
            .cloned()
            .collect())
    }
}
