use anyhow::Context;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::auth::token::{issue_token, AccessToken};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::user::{NewUser, UserProfile, UserRole, UserRow};
use crate::registration::wizard::{step_for, RegistrationStatus};
use crate::store::Store;

/// Returned by every operation that opens a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub token: AccessToken,
    pub user: UserProfile,
    pub registration: RegistrationStatus,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Argon2 is deliberately slow; keep it off the async worker threads.
pub async fn hash_password_off_thread(plain_text: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain_text))
        .await
        .context("password hashing task failed")?
}

async fn verify_off_thread(plain_text: String, hash: Option<String>) -> AppResult<bool> {
    Ok(tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&plain_text, &hash),
        None => verify_dummy(&plain_text),
    })
    .await
    .context("password verification task failed")?)
}

pub async fn sign_up(
    store: &dyn Store,
    config: &Config,
    email: &str,
    password: String,
    role: UserRole,
) -> AppResult<AuthResponse> {
    if !role.is_self_service() {
        return Err(AppError::validation(format!(
            "'{role}' cannot be chosen at sign-up; use candidate, employer or agency"
        )));
    }

    let email = normalize_email(email);
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User"));
    }

    let password_hash = hash_password_off_thread(password).await?;
    let user = store
        .create_user(NewUser {
            email,
            password_hash,
            role,
            company_id: None,
            company_profile_completed: false,
        })
        .await?;

    info!("User {} signed up as {role}", user.id);
    open_session(store, config, &user).await
}

pub async fn sign_in(
    store: &dyn Store,
    config: &Config,
    email: &str,
    password: String,
) -> AppResult<AuthResponse> {
    let user = store.find_user_by_email(&normalize_email(email)).await?;

    // unknown e-mails still pay for one verification
    let valid = verify_off_thread(password, user.as_ref().map(|u| u.password_hash.clone())).await?;

    match user {
        Some(user) if valid => {
            info!("User {} signed in", user.id);
            open_session(store, config, &user).await
        }
        _ => Err(AppError::InvalidCredentials),
    }
}

pub async fn sign_out(store: &dyn Store, user_id: Uuid, session_id: Uuid) -> AppResult<()> {
    store.revoke_session(session_id).await?;
    info!("User {user_id} signed out (session {session_id})");
    Ok(())
}

/// Creates a session row and a bearer token bound to it.
pub async fn open_session(
    store: &dyn Store,
    config: &Config,
    user: &UserRow,
) -> AppResult<AuthResponse> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(config.jwt_expiration_hours);
    let purged = store.purge_inactive_sessions(user.id, issued_at).await?;
    if purged > 0 {
        debug!("Purged {purged} inactive sessions for user {}", user.id);
    }
    let session = store.create_session(user.id, expires_at).await?;

    let token = issue_token(
        config,
        user.id,
        session.id,
        &user.user_role,
        issued_at,
        expires_at,
    )?;

    Ok(AuthResponse {
        token,
        user: UserProfile::from_row(user)?,
        registration: step_for(user)?.into(),
    })
}
