//! Port contracts for user accounts and access tokens.
//!
//! Ports define infrastructure-agnostic interfaces used by auth services.

pub mod repository;

pub use repository::{AuthRepository, AuthRepositoryError, AuthRepositoryResult};
