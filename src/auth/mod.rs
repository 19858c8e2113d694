//! User accounts and bearer-token authentication for Bottega.
//!
//! This module covers registration, credential verification, and the
//! lifetime of the access tokens presented on every protected request.
//! Tokens are opaque SHA-256 digests stored server-side with a fixed
//! expiry; passwords are stored as PBKDF2 PHC strings. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
