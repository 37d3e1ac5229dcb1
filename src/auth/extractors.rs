use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller, produced by the access gate.
///
/// Taking this as a handler argument makes the route protected: the token is
/// decoded and verified first, and only then is its subject looked up in the
/// user store.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!("missing bearer token");
            ApiError::MissingCredential
        })?;

        let claims = state.keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected token");
            ApiError::InvalidCredential
        })?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token subject not found");
                ApiError::IdentityNotFound
            })?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}

// Expect "Bearer <token>"
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}
