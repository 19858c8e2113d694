//! Service layer for the task lifecycle, deliveries, and reviews.

use crate::auth::domain::UserId;
use crate::project::{
    domain::{Project, ProjectId, ProjectRole},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::workflow::{
    domain::{
        Delivery, DeliveryDraft, DeliveryId, NewTaskData, ParseReviewVerdictError,
        ParseTaskPriorityError, ParseTaskStatusError, Review, ReviewVerdict, Task, TaskId,
        TaskPriority, TaskStatus, TaskTitle, WorkflowDomainError,
    },
    ports::{WorkflowRepository, WorkflowRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    requester_id: UserId,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    executor_id: Option<UserId>,
    reviewer_id: Option<UserId>,
    due_at: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, requester_id: UserId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            requester_id,
            title: title.into(),
            description: None,
            priority: None,
            executor_id: None,
            reviewer_id: None,
            due_at: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the urgency level by its storage string.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Names the executor assigned at creation.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: UserId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    /// Names the QA reviewer assigned at creation.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer_id: UserId) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    /// Sets the due timestamp.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

/// Request payload for a partial task metadata update.
///
/// Absent fields leave the stored value untouched. Status is never part
/// of an update; it only moves through [`TaskLifecycleService::change_status`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    executor_id: Option<UserId>,
    reviewer_id: Option<UserId>,
    due_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description; an empty string clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the urgency level by its storage string.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Assigns an executor.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: UserId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    /// Assigns a QA reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer_id: UserId) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    /// Replaces the due timestamp; `None` clears it.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

/// Request payload for submitting a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitDeliveryRequest {
    task_id: TaskId,
    actor: UserId,
    summary: String,
    methodology: Option<String>,
}

impl SubmitDeliveryRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(task_id: TaskId, actor: UserId, summary: impl Into<String>) -> Self {
        Self {
            task_id,
            actor,
            summary: summary.into(),
            methodology: None,
        }
    }

    /// Sets the methodology notes.
    #[must_use]
    pub fn with_methodology(mut self, methodology: impl Into<String>) -> Self {
        self.methodology = Some(methodology.into());
        self
    }
}

/// Request payload for rendering a verdict against a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDeliveryRequest {
    delivery_id: DeliveryId,
    reviewer_id: UserId,
    verdict: String,
    feedback: Option<String>,
}

impl ReviewDeliveryRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(delivery_id: DeliveryId, reviewer_id: UserId, verdict: impl Into<String>) -> Self {
        Self {
            delivery_id,
            reviewer_id,
            verdict: verdict.into(),
            feedback: None,
        }
    }

    /// Sets the feedback text handed back to the executor.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// A delivery paired with its review, when one has been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryWithReview {
    delivery: Delivery,
    review: Option<Review>,
}

impl DeliveryWithReview {
    /// Returns the delivery.
    #[must_use]
    pub const fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Returns the review, if one has been rendered.
    #[must_use]
    pub const fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }
}

/// The result of a rendered verdict: the review and the moved task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    review: Review,
    task: Task,
}

impl ReviewOutcome {
    /// Returns the recorded review.
    #[must_use]
    pub const fn review(&self) -> &Review {
        &self.review
    }

    /// Returns the task after the verdict arrow was taken.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// Workflow repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// The status string did not parse.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// The priority string did not parse.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),
    /// The verdict string did not parse.
    #[error(transparent)]
    InvalidVerdict(#[from] ParseReviewVerdictError),
    /// The project does not exist, or the caller may not see it.
    #[error("project {0} was not found")]
    ProjectNotFound(ProjectId),
    /// The task does not exist, or the caller may not see it.
    #[error("task {0} was not found")]
    TaskNotFound(TaskId),
    /// No delivery exists with the given identifier.
    #[error("delivery {0} was not found")]
    DeliveryNotFound(DeliveryId),
    /// The user does not appear on the project roster.
    #[error("user {user} is not a member of project {project}")]
    NotAProjectMember {
        /// The user missing from the roster.
        user: UserId,
        /// The project whose roster was checked.
        project: ProjectId,
    },
    /// The actor's roles do not permit the attempted action.
    #[error("user {user} may not {action}")]
    RoleDenied {
        /// The actor whose roles fell short.
        user: UserId,
        /// The action that was refused.
        action: &'static str,
    },
    /// A verdict targeted a delivery that a newer version has superseded.
    #[error("delivery {delivery} is stale; the latest version is {latest}")]
    StaleDelivery {
        /// The superseded delivery.
        delivery: DeliveryId,
        /// The version that superseded it.
        latest: u32,
    },
    /// The delivery already carries a verdict.
    #[error("delivery {0} has already been reviewed")]
    AlreadyReviewed(DeliveryId),
}

/// Result type for task lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Owns the role gates in front of the status machine: the domain decides
/// which arrows exist, this service decides who may take them.
pub struct TaskLifecycleService<W, P, C>
where
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    workflow: Arc<W>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<W, P, C> Clone for TaskLifecycleService<W, P, C>
where
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            workflow: Arc::clone(&self.workflow),
            projects: Arc::clone(&self.projects),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<W, P, C> TaskLifecycleService<W, P, C>
where
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(workflow: Arc<W>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            workflow,
            projects,
            clock,
        }
    }

    /// Creates a task in the `Created` status.
    ///
    /// The requester and any assignee named at creation must appear on the
    /// project roster.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`] when the project
    /// does not exist, [`TaskLifecycleError::NotAProjectMember`] when the
    /// requester or an assignee is not on the roster, and the usual
    /// validation and persistence errors.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let project = self.load_project(request.project_id).await?;
        require_member(&project, request.requester_id)?;
        if let Some(executor) = request.executor_id {
            require_member(&project, executor)?;
        }
        if let Some(reviewer) = request.reviewer_id {
            require_member(&project, reviewer)?;
        }

        let title = TaskTitle::new(request.title)?;
        let priority = parse_optional_priority(request.priority.as_deref())?.unwrap_or_default();
        let task = Task::new(
            NewTaskData {
                project_id: request.project_id,
                requester_id: request.requester_id,
                executor_id: request.executor_id,
                reviewer_id: request.reviewer_id,
                title,
                description: normalize_text(request.description),
                priority,
                due_at: request.due_at,
            },
            &*self.clock,
        );
        self.workflow.store_task(&task).await?;
        Ok(task)
    }

    /// Retrieves a task the caller may see.
    ///
    /// A task in a project the caller does not belong to is reported as
    /// not found.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or is hidden from the caller.
    pub async fn get_task(&self, id: TaskId, caller: UserId) -> TaskLifecycleResult<Task> {
        let (task, project) = self.load_task_with_project(id).await?;
        if !project.is_member(caller) {
            return Err(TaskLifecycleError::TaskNotFound(id));
        }
        Ok(task)
    }

    /// Lists the tasks of a project the caller belongs to, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`] when the project
    /// does not exist or the caller is not on its roster.
    pub async fn list_tasks(
        &self,
        project_id: ProjectId,
        caller: UserId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let project = self.load_project(project_id).await?;
        if !project.is_member(caller) {
            return Err(TaskLifecycleError::ProjectNotFound(project_id));
        }
        Ok(self.workflow.list_tasks_for_project(project_id).await?)
    }

    /// Applies a partial metadata update to a task.
    ///
    /// The caller must be a project member; assignees named in the update
    /// must be members too. The status machine is not touched here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or is hidden, [`TaskLifecycleError::NotAProjectMember`] when
    /// a named assignee is off the roster, and the usual validation and
    /// persistence errors.
    pub async fn update_task(
        &self,
        id: TaskId,
        caller: UserId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let (mut task, project) = self.load_task_with_project(id).await?;
        if !project.is_member(caller) {
            return Err(TaskLifecycleError::TaskNotFound(id));
        }
        if let Some(executor) = request.executor_id {
            require_member(&project, executor)?;
        }
        if let Some(reviewer) = request.reviewer_id {
            require_member(&project, reviewer)?;
        }

        if let Some(title) = request.title {
            task.rename(TaskTitle::new(title)?, &*self.clock);
        }
        if let Some(description) = request.description {
            task.set_description(normalize_text(Some(description)), &*self.clock);
        }
        if let Some(priority) = request.priority.as_deref() {
            task.set_priority(TaskPriority::try_from(priority)?, &*self.clock);
        }
        if let Some(due_at) = request.due_at {
            task.set_due_at(due_at, &*self.clock);
        }
        if request.executor_id.is_some() || request.reviewer_id.is_some() {
            task.assign(request.executor_id, request.reviewer_id, &*self.clock);
        }

        self.workflow.update_task(&task).await?;
        Ok(task)
    }

    /// Moves a task along a lifecycle arrow on behalf of an actor.
    ///
    /// Legality is checked first, then the role gate: organizers own
    /// `Created → Assigned`, the executor (or an organizer) drives the
    /// working arrows, and only QA takes the review arrows.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the arrow is not legal,
    /// [`TaskLifecycleError::RoleDenied`] when the actor's roles fall
    /// short, and [`TaskLifecycleError::TaskNotFound`] when the task does
    /// not exist or is hidden from the actor.
    pub async fn change_status(
        &self,
        id: TaskId,
        actor: UserId,
        target: &str,
    ) -> TaskLifecycleResult<Task> {
        let target = TaskStatus::try_from(target)?;
        let (mut task, project) = self.load_task_with_project(id).await?;
        if !project.is_member(actor) {
            return Err(TaskLifecycleError::TaskNotFound(id));
        }
        if !task.status().can_transition_to(target) {
            return Err(WorkflowDomainError::InvalidStateTransition {
                task_id: id,
                from: task.status(),
                to: target,
            }
            .into());
        }
        require_transition_role(&project, &task, actor, target)?;

        task.transition_to(target, &*self.clock)?;
        self.workflow.update_task(&task).await?;
        Ok(task)
    }

    /// Sets assignees and, when an executor is named on a fresh task,
    /// performs the `Created → Assigned` step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::RoleDenied`] unless the actor is an
    /// organizer of the owning project and
    /// [`TaskLifecycleError::NotAProjectMember`] when an assignee is off
    /// the roster.
    pub async fn assign(
        &self,
        id: TaskId,
        actor: UserId,
        executor_id: Option<UserId>,
        reviewer_id: Option<UserId>,
    ) -> TaskLifecycleResult<Task> {
        let (mut task, project) = self.load_task_with_project(id).await?;
        if !project.has_role(actor, ProjectRole::Organizer) {
            return Err(TaskLifecycleError::RoleDenied {
                user: actor,
                action: "assign the task",
            });
        }
        if let Some(executor) = executor_id {
            require_member(&project, executor)?;
        }
        if let Some(reviewer) = reviewer_id {
            require_member(&project, reviewer)?;
        }

        task.assign(executor_id, reviewer_id, &*self.clock);
        if executor_id.is_some() && task.status() == TaskStatus::Created {
            task.transition_to(TaskStatus::Assigned, &*self.clock)?;
        }
        self.workflow.update_task(&task).await?;
        Ok(task)
    }

    /// Deletes a task; its deliveries and reviews cascade away.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::RoleDenied`] unless the actor is an
    /// organizer of the owning project.
    pub async fn delete_task(&self, id: TaskId, actor: UserId) -> TaskLifecycleResult<()> {
        let (_, project) = self.load_task_with_project(id).await?;
        if !project.has_role(actor, ProjectRole::Organizer) {
            return Err(TaskLifecycleError::RoleDenied {
                user: actor,
                action: "delete the task",
            });
        }
        match self.workflow.delete_task(id).await {
            Ok(()) => Ok(()),
            Err(WorkflowRepositoryError::TaskNotFound(_)) => {
                Err(TaskLifecycleError::TaskNotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Submits a delivery for a task and moves it to `PendingQa`.
    ///
    /// Only legal while the task is `InProgress`. The version number is
    /// allocated by the repository in the same unit of work that persists
    /// the delivery and the moved task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::RoleDenied`] unless the actor is the
    /// task's executor or an organizer, [`TaskLifecycleError::Domain`]
    /// when the task is not `InProgress`, and the usual validation and
    /// persistence errors.
    pub async fn submit_delivery(
        &self,
        request: SubmitDeliveryRequest,
    ) -> TaskLifecycleResult<(Delivery, Task)> {
        let (mut task, project) = self.load_task_with_project(request.task_id).await?;
        if !project.is_member(request.actor) {
            return Err(TaskLifecycleError::TaskNotFound(request.task_id));
        }
        let is_executor = task.executor_id() == Some(request.actor);
        if !is_executor && !project.has_role(request.actor, ProjectRole::Organizer) {
            return Err(TaskLifecycleError::RoleDenied {
                user: request.actor,
                action: "submit a delivery for the task",
            });
        }

        let draft = DeliveryDraft::new(
            request.task_id,
            request.summary,
            request.methodology,
            &*self.clock,
        )?;
        task.transition_to(TaskStatus::PendingQa, &*self.clock)?;
        let delivery = self.workflow.store_delivery(draft, &task).await?;
        Ok((delivery, task))
    }

    /// Renders a verdict against the latest delivery of a task.
    ///
    /// A verdict from `PendingQa` first takes the legal `PendingQa →
    /// InReview` step, then the verdict arrow. `Approve` completes the
    /// task; `RequestChanges` parks it in `ChangesRequested`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::StaleDelivery`] when a newer version
    /// exists, [`TaskLifecycleError::AlreadyReviewed`] when the delivery
    /// carries a verdict, [`TaskLifecycleError::RoleDenied`] unless the
    /// actor is the assigned reviewer (or holds the Qa role when none is
    /// assigned), and [`TaskLifecycleError::Domain`] when the task is not
    /// reviewable.
    pub async fn review_delivery(
        &self,
        request: ReviewDeliveryRequest,
    ) -> TaskLifecycleResult<ReviewOutcome> {
        let verdict = ReviewVerdict::try_from(request.verdict.as_str())?;
        let delivery = self
            .workflow
            .find_delivery(request.delivery_id)
            .await?
            .ok_or(TaskLifecycleError::DeliveryNotFound(request.delivery_id))?;
        let (mut task, project) = self.load_task_with_project(delivery.task_id()).await?;
        if !project.is_member(request.reviewer_id) {
            return Err(TaskLifecycleError::DeliveryNotFound(request.delivery_id));
        }
        require_reviewer(&project, &task, request.reviewer_id)?;

        let latest = self
            .workflow
            .latest_delivery_version(delivery.task_id())
            .await?
            .unwrap_or(0);
        if delivery.version() < latest {
            return Err(TaskLifecycleError::StaleDelivery {
                delivery: request.delivery_id,
                latest,
            });
        }
        if self
            .workflow
            .find_review_for_delivery(request.delivery_id)
            .await?
            .is_some()
        {
            return Err(TaskLifecycleError::AlreadyReviewed(request.delivery_id));
        }

        let review = Review::new(
            request.delivery_id,
            request.reviewer_id,
            verdict,
            request.feedback,
            &*self.clock,
        )?;
        if task.status() == TaskStatus::PendingQa {
            task.transition_to(TaskStatus::InReview, &*self.clock)?;
        }
        let target = match verdict {
            ReviewVerdict::Approve => TaskStatus::Completed,
            ReviewVerdict::RequestChanges => TaskStatus::ChangesRequested,
        };
        task.transition_to(target, &*self.clock)?;

        match self.workflow.store_review(&review, &task).await {
            Ok(()) => Ok(ReviewOutcome { review, task }),
            Err(WorkflowRepositoryError::DuplicateReview(id)) => {
                Err(TaskLifecycleError::AlreadyReviewed(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the deliveries of a task, newest version first, each paired
    /// with its review when one has been rendered.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or is hidden from the caller.
    pub async fn list_deliveries(
        &self,
        task_id: TaskId,
        caller: UserId,
    ) -> TaskLifecycleResult<Vec<DeliveryWithReview>> {
        let (_, project) = self.load_task_with_project(task_id).await?;
        if !project.is_member(caller) {
            return Err(TaskLifecycleError::TaskNotFound(task_id));
        }

        let deliveries = self.workflow.list_deliveries(task_id).await?;
        let delivery_ids: Vec<DeliveryId> = deliveries.iter().map(Delivery::id).collect();
        let reviews = self
            .workflow
            .list_reviews_for_deliveries(&delivery_ids)
            .await?;
        Ok(deliveries
            .into_iter()
            .map(|delivery| {
                let review = reviews
                    .iter()
                    .find(|review| review.delivery_id() == delivery.id())
                    .cloned();
                DeliveryWithReview { delivery, review }
            })
            .collect())
    }

    async fn load_project(&self, id: ProjectId) -> TaskLifecycleResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::ProjectNotFound(id))
    }

    /// Loads a task together with its owning project.
    ///
    /// A task whose project row has vanished is treated as not found; the
    /// cascade is mid-flight.
    async fn load_task_with_project(&self, id: TaskId) -> TaskLifecycleResult<(Task, Project)> {
        let task = self
            .workflow
            .find_task(id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))?;
        let project = self
            .projects
            .find_by_id(task.project_id())
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))?;
        Ok((task, project))
    }
}

fn require_member(project: &Project, user: UserId) -> TaskLifecycleResult<()> {
    if project.is_member(user) {
        Ok(())
    } else {
        Err(TaskLifecycleError::NotAProjectMember {
            user,
            project: project.id(),
        })
    }
}

/// Checks the role gate for a legal arrow.
///
/// Callers must have established legality already; unknown arrows are
/// denied outright.
fn require_transition_role(
    project: &Project,
    task: &Task,
    actor: UserId,
    target: TaskStatus,
) -> TaskLifecycleResult<()> {
    let allowed = match (task.status(), target) {
        (TaskStatus::Created, TaskStatus::Assigned) => {
            project.has_role(actor, ProjectRole::Organizer)
        }
        (TaskStatus::Assigned | TaskStatus::ChangesRequested, TaskStatus::InProgress)
        | (TaskStatus::InProgress, TaskStatus::PendingQa) => {
            task.executor_id() == Some(actor) || project.has_role(actor, ProjectRole::Organizer)
        }
        (TaskStatus::PendingQa, TaskStatus::InReview)
        | (TaskStatus::InReview, TaskStatus::ChangesRequested | TaskStatus::Completed) => {
            is_reviewer(project, task, actor)
        }
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(TaskLifecycleError::RoleDenied {
            user: actor,
            action: "move the task to the requested status",
        })
    }
}

fn require_reviewer(project: &Project, task: &Task, actor: UserId) -> TaskLifecycleResult<()> {
    if is_reviewer(project, task, actor) {
        Ok(())
    } else {
        Err(TaskLifecycleError::RoleDenied {
            user: actor,
            action: "review deliveries for the task",
        })
    }
}

/// The assigned reviewer owns the review arrows; when no reviewer is
/// assigned, any member holding the Qa role may step in. Organizers get
/// no bypass here.
fn is_reviewer(project: &Project, task: &Task, actor: UserId) -> bool {
    task.reviewer_id().map_or_else(
        || project.has_role(actor, ProjectRole::Qa),
        |reviewer| reviewer == actor,
    )
}

fn parse_optional_priority(
    priority: Option<&str>,
) -> Result<Option<TaskPriority>, ParseTaskPriorityError> {
    priority.map(TaskPriority::try_from).transpose()
}

/// Collapses empty or blank text fields to none.
fn normalize_text(text: Option<String>) -> Option<String> {
    text.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
