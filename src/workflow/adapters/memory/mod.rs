//! In-memory adapters for the workflow context.

mod repository;

pub use repository::InMemoryWorkflowRepository;
