//! Domain model for user accounts and access tokens.
//!
//! The auth domain models account registration, password hashing and
//! verification, and opaque bearer tokens with server-side expiry while
//! keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod token;
mod user;

pub use error::{AuthDomainError, ParseTokenDigestError};
pub use ids::{AccessTokenId, UserId};
pub use token::{AccessToken, PersistedAccessTokenData, TokenDigest};
pub use user::{EmailAddress, PasswordHash, PersistedUserData, User};
