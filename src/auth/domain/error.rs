//! Error types for auth domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing auth domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthDomainError {
    /// The full name is empty after trimming.
    #[error("full name must not be empty")]
    EmptyFullName,

    /// The email address is not structurally valid.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The password is shorter than the allowed minimum.
    #[error("password must be at least {minimum} characters")]
    PasswordTooShort {
        /// Minimum accepted password length.
        minimum: usize,
    },

    /// Deriving the PBKDF2 hash failed.
    #[error("password hashing failed: {0}")]
    PasswordHashing(String),
}

/// Error returned while parsing a presented bearer token.
///
/// The offending value is deliberately not echoed back: presented tokens
/// are credentials and must stay out of logs and error payloads.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("malformed access token")]
pub struct ParseTokenDigestError;
