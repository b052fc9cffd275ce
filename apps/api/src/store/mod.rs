//! Persistence seam. Handlers and services talk to `Arc<dyn Store>`;
//! production wires `PgStore`, unit tests wire `MemoryStore`.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::company::{CompanyProfile, CompanyRow};
use crate::models::invitation::{InvitationRow, NewInvitation};
use crate::models::session::SessionRow;
use crate::models::user::{NewUser, PersonalProfile, UserRow};

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. Fails with `Conflict` when the e-mail is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<UserRow>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRow>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>>;

    /// Copies the profile fields and sets `personal_profile_completed`.
    async fn update_personal_profile(
        &self,
        user_id: Uuid,
        profile: &PersonalProfile,
    ) -> AppResult<UserRow>;

    /// Inserts the company and links it to its owner in one transaction,
    /// setting `company_profile_completed`. Fails with `Conflict` when the
    /// owner already has a company.
    async fn create_owned_company(
        &self,
        owner_id: Uuid,
        profile: &CompanyProfile,
    ) -> AppResult<(CompanyRow, UserRow)>;

    async fn find_company(&self, id: Uuid) -> AppResult<Option<CompanyRow>>;

    async fn list_company_members(&self, company_id: Uuid) -> AppResult<Vec<UserRow>>;

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<SessionRow>;

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>>;

    async fn revoke_session(&self, id: Uuid) -> AppResult<()>;

    /// Deletes the user's revoked or expired sessions; returns how many.
    async fn purge_inactive_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64>;

    async fn create_invitation(&self, invitation: NewInvitation) -> AppResult<InvitationRow>;

    async fn find_invitation_by_token(&self, token: &str) -> AppResult<Option<InvitationRow>>;

    /// Unaccepted, unexpired invitation for `email` into `company_id`.
    async fn find_pending_invitation(
        &self,
        company_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<InvitationRow>>;

    async fn list_invitations(&self, company_id: Uuid) -> AppResult<Vec<InvitationRow>>;

    /// Marks the invitation accepted and creates the invited user in one
    /// transaction. Fails with `NotFound` if it was accepted concurrently.
    async fn accept_invitation(&self, invitation_id: Uuid, user: NewUser) -> AppResult<UserRow>;
}
