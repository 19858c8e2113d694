//! Service layer for adding, removing, and aggregating attachments.

use crate::attachment::{
    domain::{
        Attachment, AttachmentContext, AttachmentDomainError, AttachmentId, AttachmentUrl,
        NewAttachmentData, ParseAttachmentContextError, ParseResourceTypeError, ResourceType,
    },
    ports::{AttachmentRepository, AttachmentRepositoryError},
};
use crate::auth::domain::UserId;
use crate::project::{
    domain::{Project, ProjectRole},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::workflow::{
    domain::{Delivery, DeliveryId, Review, ReviewId, Task, TaskId},
    ports::{WorkflowRepository, WorkflowRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Request payload for adding an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAttachmentRequest {
    context: String,
    parent_id: Uuid,
    resource_type: String,
    url: String,
    file_name: Option<String>,
    uploader: UserId,
}

impl AddAttachmentRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        parent_id: Uuid,
        resource_type: impl Into<String>,
        url: impl Into<String>,
        uploader: UserId,
    ) -> Self {
        Self {
            context: context.into(),
            parent_id,
            resource_type: resource_type.into(),
            url: url.into(),
            file_name: None,
            uploader,
        }
    }

    /// Sets the original file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// The full attachment bundle of a task, grouped by context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAttachmentBundle {
    request: Vec<Attachment>,
    delivery: Vec<Attachment>,
    review: Vec<Attachment>,
}

impl TaskAttachmentBundle {
    /// Returns the attachments of the task request itself.
    #[must_use]
    pub fn request(&self) -> &[Attachment] {
        &self.request
    }

    /// Returns the attachments across every delivery of the task.
    #[must_use]
    pub fn delivery(&self) -> &[Attachment] {
        &self.delivery
    }

    /// Returns the attachments across every review of those deliveries.
    #[must_use]
    pub fn review(&self) -> &[Attachment] {
        &self.review
    }
}

/// Service-level errors for attachment library operations.
#[derive(Debug, Error)]
pub enum AttachmentLibraryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AttachmentDomainError),
    /// Attachment repository operation failed.
    #[error(transparent)]
    Repository(#[from] AttachmentRepositoryError),
    /// Workflow lookup failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// The context string did not parse.
    #[error(transparent)]
    InvalidContext(#[from] ParseAttachmentContextError),
    /// The resource type string did not parse.
    #[error(transparent)]
    InvalidResourceType(#[from] ParseResourceTypeError),
    /// No parent row exists under the claimed context.
    #[error("no {context} parent {parent_id} was found")]
    ParentNotFound {
        /// The claimed context tag.
        context: AttachmentContext,
        /// The missing parent identifier.
        parent_id: Uuid,
    },
    /// The attachment does not exist, or the caller may not see it.
    #[error("attachment {0} was not found")]
    AttachmentNotFound(AttachmentId),
    /// The task does not exist, or the caller may not see it.
    #[error("task {0} was not found")]
    TaskNotFound(TaskId),
    /// The uploader does not appear on the owning project roster.
    #[error("user {0} is not a member of the owning project")]
    NotAProjectMember(UserId),
    /// Only the uploader or an organizer may remove an attachment.
    #[error("user {0} may not remove the attachment")]
    RemovalDenied(UserId),
}

/// Result type for attachment library operations.
pub type AttachmentLibraryResult<T> = Result<T, AttachmentLibraryError>;

/// Attachment library orchestration service.
///
/// Every operation resolves the polymorphic parent chain back to the
/// owning project before touching storage, so attachments can never be
/// orphaned or leak across project boundaries.
pub struct AttachmentLibraryService<A, W, P, C>
where
    A: AttachmentRepository,
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    attachments: Arc<A>,
    workflow: Arc<W>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<A, W, P, C> Clone for AttachmentLibraryService<A, W, P, C>
where
    A: AttachmentRepository,
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            attachments: Arc::clone(&self.attachments),
            workflow: Arc::clone(&self.workflow),
            projects: Arc::clone(&self.projects),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A, W, P, C> AttachmentLibraryService<A, W, P, C>
where
    A: AttachmentRepository,
    W: WorkflowRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment library service.
    #[must_use]
    pub const fn new(
        attachments: Arc<A>,
        workflow: Arc<W>,
        projects: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            attachments,
            workflow,
            projects,
            clock,
        }
    }

    /// Adds an attachment under a task, delivery, or review.
    ///
    /// The parent must exist under the claimed context and the uploader
    /// must be a member of the owning project.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentLibraryError::ParentNotFound`] when the context
    /// and parent identifier do not resolve,
    /// [`AttachmentLibraryError::NotAProjectMember`] when the uploader is
    /// off the roster, and the usual validation and persistence errors.
    pub async fn add(&self, request: AddAttachmentRequest) -> AttachmentLibraryResult<Attachment> {
        let context = AttachmentContext::try_from(request.context.as_str())?;
        let resource_type = ResourceType::try_from(request.resource_type.as_str())?;
        let url = AttachmentUrl::new(request.url)?;

        let project = self.resolve_owning_project(context, request.parent_id).await?;
        if !project.is_member(request.uploader) {
            return Err(AttachmentLibraryError::NotAProjectMember(request.uploader));
        }

        let attachment = Attachment::new(
            NewAttachmentData {
                context,
                parent_id: request.parent_id,
                resource_type,
                url,
                file_name: normalize_file_name(request.file_name),
                uploaded_by: request.uploader,
            },
            &*self.clock,
        );
        self.attachments.store(&attachment).await?;
        Ok(attachment)
    }

    /// Removes an attachment.
    ///
    /// Allowed for the uploader and for organizers of the owning project.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentLibraryError::AttachmentNotFound`] when the
    /// attachment does not exist and
    /// [`AttachmentLibraryError::RemovalDenied`] when the actor is neither
    /// the uploader nor an organizer.
    pub async fn remove(&self, id: AttachmentId, actor: UserId) -> AttachmentLibraryResult<()> {
        let attachment = self
            .attachments
            .find_by_id(id)
            .await?
            .ok_or(AttachmentLibraryError::AttachmentNotFound(id))?;

        let project = self
            .resolve_owning_project(attachment.context(), attachment.parent_id())
            .await?;
        let is_uploader = attachment.uploaded_by() == actor;
        if !is_uploader && !project.has_role(actor, ProjectRole::Organizer) {
            return Err(AttachmentLibraryError::RemovalDenied(actor));
        }

        match self.attachments.delete(id).await {
            Ok(()) => Ok(()),
            Err(AttachmentRepositoryError::AttachmentNotFound(_)) => {
                Err(AttachmentLibraryError::AttachmentNotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Collects the full attachment bundle of a task: request-context
    /// attachments of the task itself, delivery-context attachments of
    /// all its deliveries, and review-context attachments of those
    /// deliveries' reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentLibraryError::TaskNotFound`] when the task does
    /// not exist or is hidden from the caller.
    pub async fn list_for_task(
        &self,
        task_id: TaskId,
        caller: UserId,
    ) -> AttachmentLibraryResult<TaskAttachmentBundle> {
        let task = self
            .workflow
            .find_task(task_id)
            .await?
            .ok_or(AttachmentLibraryError::TaskNotFound(task_id))?;
        let project = self
            .projects
            .find_by_id(task.project_id())
            .await?
            .ok_or(AttachmentLibraryError::TaskNotFound(task_id))?;
        if !project.is_member(caller) {
            return Err(AttachmentLibraryError::TaskNotFound(task_id));
        }

        let deliveries = self.workflow.list_deliveries(task_id).await?;
        let delivery_ids: Vec<DeliveryId> = deliveries.iter().map(Delivery::id).collect();
        let reviews = self
            .workflow
            .list_reviews_for_deliveries(&delivery_ids)
            .await?;

        let delivery_parents: Vec<Uuid> =
            delivery_ids.iter().map(|id| id.into_inner()).collect();
        let review_parents: Vec<Uuid> = reviews
            .iter()
            .map(Review::id)
            .map(ReviewId::into_inner)
            .collect();

        let request = self
            .attachments
            .list_for_parents(AttachmentContext::Request, &[task_id.into_inner()])
            .await?;
        let delivery = self
            .attachments
            .list_for_parents(AttachmentContext::Delivery, &delivery_parents)
            .await?;
        let review = self
            .attachments
            .list_for_parents(AttachmentContext::Review, &review_parents)
            .await?;

        Ok(TaskAttachmentBundle {
            request,
            delivery,
            review,
        })
    }

    /// Walks the parent chain of a `(context, parent_id)` pair up to the
    /// owning project.
    async fn resolve_owning_project(
        &self,
        context: AttachmentContext,
        parent_id: Uuid,
    ) -> AttachmentLibraryResult<Project> {
        let not_found = AttachmentLibraryError::ParentNotFound { context, parent_id };
        let found = match context {
            AttachmentContext::Request => self
                .workflow
                .find_task(TaskId::from_uuid(parent_id))
                .await?,
            AttachmentContext::Delivery => {
                self.task_of_delivery(DeliveryId::from_uuid(parent_id))
                    .await?
            }
            AttachmentContext::Review => {
                match self
                    .workflow
                    .find_review(ReviewId::from_uuid(parent_id))
                    .await?
                {
                    Some(review) => self.task_of_delivery(review.delivery_id()).await?,
                    None => None,
                }
            }
        };
        let task = found.ok_or(not_found)?;
        self.projects
            .find_by_id(task.project_id())
            .await?
            .ok_or(AttachmentLibraryError::ParentNotFound { context, parent_id })
    }

    async fn task_of_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> AttachmentLibraryResult<Option<Task>> {
        let Some(delivery) = self.workflow.find_delivery(delivery_id).await? else {
            return Ok(None);
        };
        Ok(self.workflow.find_task(delivery.task_id()).await?)
    }
}

/// Collapses empty or blank file names to none.
fn normalize_file_name(file_name: Option<String>) -> Option<String> {
    file_name.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
