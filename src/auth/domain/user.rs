//! User aggregate root and credential value types.

use super::{AuthDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use pbkdf2::{
    Pbkdf2,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum accepted password length, in characters.
pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;

/// Normalized, structurally validated email address.
///
/// Addresses are trimmed and lowercased on construction so that lookups
/// and uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::InvalidEmail`] if the value does not
    /// contain exactly one `@` separating a non-empty local part from a
    /// dotted, whitespace-free domain.
    pub fn new(value: impl Into<String>) -> Result<Self, AuthDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = normalized.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.contains('@')
                && !normalized.chars().any(char::is_whitespace)
        });

        if !is_valid {
            return Err(AuthDomainError::InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PBKDF2 password hash in PHC string format.
///
/// The plaintext password never leaves this type's constructors; equality
/// comparisons and `Debug` output only ever see the salted hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derives a salted hash from a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::PasswordTooShort`] when the password has
    /// fewer than the minimum number of characters, or
    /// [`AuthDomainError::PasswordHashing`] when hash derivation fails.
    pub fn derive(password: &str) -> Result<Self, AuthDomainError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthDomainError::PasswordTooShort {
                minimum: MIN_PASSWORD_LENGTH,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Pbkdf2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AuthDomainError::PasswordHashing(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Reconstructs a hash from its persisted PHC string.
    #[must_use]
    pub const fn from_phc_string(value: String) -> Self {
        Self(value)
    }

    /// Checks a plaintext password against this hash.
    ///
    /// Unparseable stored hashes verify as `false` rather than erroring so
    /// that a corrupted row behaves like a wrong password.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        PhcHash::new(&self.0)
            .map(|parsed| Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }

    /// Returns the PHC string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    full_name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub full_name: String,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted avatar URL, if any.
    pub avatar_url: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::EmptyFullName`] when the display name is
    /// empty after trimming.
    pub fn new(
        full_name: impl Into<String>,
        email: EmailAddress,
        password_hash: PasswordHash,
        avatar_url: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, AuthDomainError> {
        let trimmed = full_name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(AuthDomainError::EmptyFullName);
        }

        Ok(Self {
            id: UserId::new(),
            full_name: trimmed,
            email,
            password_hash,
            avatar_url,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            full_name: data.full_name,
            email: data.email,
            password_hash: data.password_hash,
            avatar_url: data.avatar_url,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the avatar URL, if any.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the short display code derived from the identifier.
    ///
    /// The code is `USR` followed by the first six hex digits of the UUID,
    /// uppercased.
    #[must_use]
    pub fn code(&self) -> String {
        let prefix: String = self
            .id
            .into_inner()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect();
        format!("USR{}", prefix.to_ascii_uppercase())
    }
}
