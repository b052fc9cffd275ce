use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::auth::service::{self, AuthResponse};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{trimmed, ValidatedJson};
use crate::models::user::{UserProfile, UserRole};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub user_role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let resp = service::sign_up(
        state.store.as_ref(),
        &state.config,
        &req.email,
        req.password,
        req.user_role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let resp =
        service::sign_in(state.store.as_ref(), &state.config, &req.email, req.password).await?;
    Ok(Json(resp))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    service::sign_out(state.store.as_ref(), auth.user.id, auth.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(auth: AuthUser) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(UserProfile::from_row(&auth.user)?))
}
