//! Bearer-token extraction for protected routes.

use super::{error::ApiError, state::AppState};
use crate::auth::domain::{TokenDigest, User};
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

/// The authenticated caller of a protected route.
///
/// Extracting this from a request resolves the `Authorization: Bearer`
/// header against stored tokens; absence or rejection becomes a 401
/// before the handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    user: User,
    token: TokenDigest,
}

impl CurrentUser {
    /// Returns the authenticated user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the digest the caller presented.
    #[must_use]
    pub const fn token(&self) -> &TokenDigest {
        &self.token
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(ApiError::unauthenticated)?;
        let bearer = header
            .strip_prefix("Bearer ")
            .ok_or_else(ApiError::unauthenticated)?;
        let token =
            TokenDigest::try_from(bearer).map_err(|_| ApiError::unauthenticated())?;

        let user = state.accounts().authenticate(&token).await?;
        Ok(Self { user, token })
    }
}
