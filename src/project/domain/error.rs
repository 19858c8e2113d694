//! Error types for the project domain.

use thiserror::Error;

/// Validation errors raised by project domain types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// Project name was empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,
    /// Project name exceeded the storage limit.
    #[error("project name must be at most {maximum} characters")]
    NameTooLong {
        /// Maximum accepted length in characters.
        maximum: usize,
    },
}

/// Error raised when parsing an unknown project status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error raised when parsing an unknown project role string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project role: {0}")]
pub struct ParseProjectRoleError(pub String);
