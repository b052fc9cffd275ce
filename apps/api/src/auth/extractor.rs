use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::token::verify_token;
use crate::errors::AppError;
use crate::models::user::{UserRole, UserRow};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller, resolved from `Authorization: Bearer <jwt>`.
///
/// The token must verify, its session must be live (not revoked, not
/// expired) and the user must still exist.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRow,
    pub role: UserRole,
    pub session_id: Uuid,
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
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(AppError::Unauthorized)?;

        let claims = verify_token(&state.config, token)?;

        let session = state
            .store
            .find_session(claims.sid)
            .await?
            .filter(|s| s.user_id == claims.sub && s.is_active(Utc::now()))
            .ok_or(AppError::Unauthorized)?;

        let user = state
            .store
            .find_user(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let role = user.role()?;

        Ok(AuthUser {
            user,
            role,
            session_id: session.id,
        })
    }
}
