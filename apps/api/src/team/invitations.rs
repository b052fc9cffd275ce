//! Team invitations: owners and admins of a company invite people by
//! e-mail; the invitee accepts with the token and picks a password.

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::service::{hash_password_off_thread, normalize_email, open_session, AuthResponse};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::dashboard::view::can_invite;
use crate::errors::{AppError, AppResult};
use crate::models::company::CompanyRow;
use crate::models::invitation::{InvitationRow, InvitationStatus, NewInvitation};
use crate::models::user::{NewUser, UserProfile, UserRole};
use crate::store::Store;

pub const INVITATION_SENT: &str = "Invitation sent successfully!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationView {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub status: InvitationStatus,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl InvitationView {
    fn from_row(row: InvitationRow, now: DateTime<Utc>) -> Self {
        InvitationView {
            status: row.status(now),
            id: row.id,
            email: row.email,
            role: row.role,
            token: row.token,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    pub message: String,
    pub invitation: InvitationView,
}

/// 64 hex characters from two v4 UUIDs.
fn new_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Loads the caller's company, refusing callers who belong elsewhere.
async fn member_company(store: &dyn Store, auth: &AuthUser, company_id: Uuid) -> AppResult<CompanyRow> {
    if auth.user.company_id != Some(company_id) {
        return Err(AppError::Forbidden);
    }
    store
        .find_company(company_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Company {company_id} not found")))
}

async fn inviting_company(store: &dyn Store, auth: &AuthUser, company_id: Uuid) -> AppResult<CompanyRow> {
    let company = member_company(store, auth, company_id).await?;
    if !can_invite(auth.role, auth.user.id, Some(&company)) {
        return Err(AppError::Forbidden);
    }
    Ok(company)
}

pub async fn invite(
    store: &dyn Store,
    config: &Config,
    auth: &AuthUser,
    company_id: Uuid,
    email: &str,
    role: UserRole,
) -> AppResult<InviteResponse> {
    let company = inviting_company(store, auth, company_id).await?;

    if !role.is_team_role() {
        return Err(AppError::validation("Team members can only be invited as member or admin"));
    }

    let email = normalize_email(email);
    let now = Utc::now();
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User"));
    }
    if store
        .find_pending_invitation(company.id, &email, now)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Invitation"));
    }

    let row = store
        .create_invitation(NewInvitation {
            company_id: company.id,
            email,
            role: role.as_str().to_string(),
            token: new_token(),
            invited_by: auth.user.id,
            expires_at: now + Duration::hours(config.invitation_ttl_hours),
        })
        .await?;

    info!(
        "User {} invited {} into company {} as {role}",
        auth.user.id, row.email, company.id
    );

    Ok(InviteResponse {
        message: INVITATION_SENT.to_string(),
        invitation: InvitationView::from_row(row, now),
    })
}

pub async fn list_invitations(
    store: &dyn Store,
    auth: &AuthUser,
    company_id: Uuid,
) -> AppResult<Vec<InvitationView>> {
    let company = inviting_company(store, auth, company_id).await?;
    let now = Utc::now();
    Ok(store
        .list_invitations(company.id)
        .await?
        .into_iter()
        .map(|row| InvitationView::from_row(row, now))
        .collect())
}

pub async fn list_members(
    store: &dyn Store,
    auth: &AuthUser,
    company_id: Uuid,
) -> AppResult<Vec<UserProfile>> {
    let company = member_company(store, auth, company_id).await?;
    store
        .list_company_members(company.id)
        .await?
        .iter()
        .map(|row| UserProfile::from_row(row).map_err(AppError::from))
        .collect()
}

pub async fn accept(
    store: &dyn Store,
    config: &Config,
    token: &str,
    password: String,
) -> AppResult<AuthResponse> {
    let invitation = store
        .find_invitation_by_token(token)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;

    match invitation.status(Utc::now()) {
        InvitationStatus::Pending => {}
        InvitationStatus::Accepted => return Err(AppError::not_found("Invitation not found")),
        InvitationStatus::Expired => {
            warn!("Expired invitation {} presented", invitation.id);
            return Err(AppError::validation("Invitation has expired"));
        }
    }

    let role: UserRole = invitation
        .role
        .parse()
        .map_err(|e: String| anyhow!("invitation {}: {e}", invitation.id))?;
    let password_hash = hash_password_off_thread(password).await?;

    let user = store
        .accept_invitation(
            invitation.id,
            NewUser {
                email: invitation.email.clone(),
                password_hash,
                role,
                company_id: Some(invitation.company_id),
                company_profile_completed: true,
            },
        )
        .await?;

    open_session(store, config, &user).await
}
