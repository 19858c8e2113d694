//! `PostgreSQL` adapters for the workflow context.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{PostgresWorkflowRepository, WorkflowPgPool};
