//! Service layer orchestrating the task lifecycle.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, DeliveryWithReview, ReviewDeliveryRequest, ReviewOutcome,
    SubmitDeliveryRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest,
};
