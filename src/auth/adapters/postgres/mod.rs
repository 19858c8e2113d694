//! `PostgreSQL` adapter for the auth repository port.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{AuthPgPool, PostgresAuthRepository};
