use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;
use uuid::Uuid;

use super::repo_types::User;
use crate::{error::AppError, state::AppState};

/// Caller identity resolved from a bearer token.
///
/// `user` is `None` when the token is valid but its user is gone; that only
/// happens while `AccessPolicy::reject_unknown_users` is off.
pub struct AuthUser {
    pub id: Uuid,
    pub user: Option<User>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(AppError::not_authorized)?;

        let id = state.keys.verify(token).map_err(|e| {
            warn!(reason = %e, "rejected bearer token");
            AppError::not_authorized()
        })?;

        let user = state.users.find_by_id(id).await?;
        if user.is_none() {
            if state.config.policy.reject_unknown_users {
                warn!(user_id = %id, "token for unknown user rejected");
                return Err(AppError::not_authorized());
            }
            warn!(user_id = %id, "token for unknown user accepted");
        }

        Ok(AuthUser { id, user })
    }
}

/// Extracts `<token>` from `Bearer <token>`.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
