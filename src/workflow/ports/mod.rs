//! Port definitions for the workflow context.

mod repository;

pub use repository::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult};
