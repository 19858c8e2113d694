//! Domain model for the workflow context.

mod delivery;
mod error;
mod ids;
mod review;
mod task;

pub use delivery::{Delivery, DeliveryDraft, PersistedDeliveryData};
pub use error::{
    ParseReviewVerdictError, ParseTaskPriorityError, ParseTaskStatusError, WorkflowDomainError,
};
pub use ids::{DeliveryId, ReviewId, TaskId};
pub use review::{PersistedReviewData, Review, ReviewVerdict};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPriority, TaskStatus, TaskTitle};
