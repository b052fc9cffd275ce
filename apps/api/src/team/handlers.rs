use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::service::AuthResponse;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{trimmed, ValidatedJson};
use crate::models::user::{UserProfile, UserRole};
use crate::state::AppState;
use crate::team::invitations::{self, InvitationView, InviteResponse};

fn default_team_role() -> UserRole {
    UserRole::Member
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default = "default_team_role")]
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    #[validate(length(min = 1, message = "Invitation token is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// POST /api/v1/companies/:company_id/invitations
pub async fn handle_invite(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<InviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), AppError> {
    let resp = invitations::invite(
        state.store.as_ref(),
        &state.config,
        &auth,
        company_id,
        &req.email,
        req.role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/companies/:company_id/invitations
pub async fn handle_list_invitations(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<Vec<InvitationView>>, AppError> {
    Ok(Json(
        invitations::list_invitations(state.store.as_ref(), &auth, company_id).await?,
    ))
}

/// GET /api/v1/companies/:company_id/members
pub async fn handle_list_members(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(
        invitations::list_members(state.store.as_ref(), &auth, company_id).await?,
    ))
}

/// POST /api/v1/invitations/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AcceptInvitationRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let resp =
        invitations::accept(state.store.as_ref(), &state.config, &req.token, req.password).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
