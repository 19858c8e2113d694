//! Opaque bearer tokens with server-side expiry.

use super::{AccessTokenId, ParseTokenDigestError, UserId};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Token lifetime in days, counted from issue time.
pub(crate) const TOKEN_TTL_DAYS: i64 = 30;

/// Length of the random seed hashed into a token digest.
const TOKEN_SEED_LENGTH: usize = 60;

/// Opaque bearer token value: 64 lowercase hex digits of a SHA-256 digest.
///
/// The digest itself is the credential; there is no recoverable secret
/// behind it. `Debug` is still derived because the value only ever appears
/// in storage and in the response that hands it to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Generates a fresh token from 60 random alphanumeric characters.
    #[must_use]
    pub fn generate() -> Self {
        let seed: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_SEED_LENGTH)
            .map(char::from)
            .collect();
        Self(hex::encode(Sha256::digest(seed.as_bytes())))
    }

    /// Returns the digest as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TokenDigest {
    type Error = ParseTokenDigestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let is_valid = trimmed.len() == 64
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !is_valid {
            return Err(ParseTokenDigestError);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Access token record binding a digest to a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    id: AccessTokenId,
    user_id: UserId,
    digest: TokenDigest,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAccessTokenData {
    /// Persisted token identifier.
    pub id: AccessTokenId,
    /// Owning user identifier.
    pub user_id: UserId,
    /// Persisted digest value.
    pub digest: TokenDigest,
    /// Persisted expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Mints a fresh token for a user, expiring a fixed number of days
    /// from the current clock time.
    #[must_use]
    pub fn mint(user_id: UserId, clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            id: AccessTokenId::new(),
            user_id,
            digest: TokenDigest::generate(),
            expires_at: now + Duration::days(TOKEN_TTL_DAYS),
            created_at: now,
        }
    }

    /// Reconstructs a token from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAccessTokenData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            digest: data.digest,
            expires_at: data.expires_at,
            created_at: data.created_at,
        }
    }

    /// Returns the token identifier.
    #[must_use]
    pub const fn id(&self) -> AccessTokenId {
        self.id
    }

    /// Returns the owning user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the digest value.
    #[must_use]
    pub const fn digest(&self) -> &TokenDigest {
        &self.digest
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the token is no longer valid at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
