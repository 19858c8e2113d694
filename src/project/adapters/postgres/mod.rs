//! `PostgreSQL` adapters for the project context.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{PostgresProjectRepository, ProjectPgPool};
