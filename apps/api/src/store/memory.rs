use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::company::{CompanyProfile, CompanyRow};
use crate::models::invitation::{InvitationRow, NewInvitation};
use crate::models::session::SessionRow;
use crate::models::user::{NewUser, PersonalProfile, UserRow};
use crate::store::Store;

/// In-process store used by unit tests. Mirrors the unique constraints
/// of the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    companies: Vec<CompanyRow>,
    sessions: Vec<SessionRow>,
    invitations: Vec<InvitationRow>,
}

impl Tables {
    fn insert_user(&mut self, user: NewUser) -> AppResult<UserRow> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User"));
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            user_role: user.role.as_str().to_string(),
            company_id: user.company_id,
            first_name: None,
            last_name: None,
            phone_number: None,
            bio: None,
            personal_profile_completed: false,
            company_profile_completed: user.company_profile_completed,
            created_at: now,
            updated_at: now,
        };
        self.users.push(row.clone());
        Ok(row)
    }

    fn user_mut(&mut self, id: Uuid) -> AppResult<&mut UserRow> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

impl MemoryStore {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.inner.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<UserRow> {
        self.tables().insert_user(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRow>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_personal_profile(
        &self,
        user_id: Uuid,
        profile: &PersonalProfile,
    ) -> AppResult<UserRow> {
        let mut tables = self.tables();
        let user = tables.user_mut(user_id)?;
        user.first_name = Some(profile.first_name.clone());
        user.last_name = Some(profile.last_name.clone());
        user.phone_number = profile.phone_number.clone();
        user.bio = profile.bio.clone();
        user.personal_profile_completed = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_owned_company(
        &self,
        owner_id: Uuid,
        profile: &CompanyProfile,
    ) -> AppResult<(CompanyRow, UserRow)> {
        let mut tables = self.tables();
        if tables.companies.iter().any(|c| c.owner_id == owner_id) {
            return Err(AppError::conflict("Company profile"));
        }
        let company = CompanyRow {
            id: Uuid::new_v4(),
            owner_id,
            name: profile.name.clone(),
            industry: profile.industry.clone(),
            website: profile.website.clone(),
            company_size: profile.company_size.clone(),
            location: profile.location.clone(),
            description: profile.description.clone(),
            created_at: Utc::now(),
        };
        let owner = tables.user_mut(owner_id)?;
        owner.company_id = Some(company.id);
        owner.company_profile_completed = true;
        owner.updated_at = Utc::now();
        let owner = owner.clone();
        tables.companies.push(company.clone());
        Ok((company, owner))
    }

    async fn find_company(&self, id: Uuid) -> AppResult<Option<CompanyRow>> {
        Ok(self.tables().companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list_company_members(&self, company_id: Uuid) -> AppResult<Vec<UserRow>> {
        Ok(self
            .tables()
            .users
            .iter()
            .filter(|u| u.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<SessionRow> {
        let session = SessionRow {
            id: Uuid::new_v4(),
            user_id,
            expires_at,
            revoked_at: None,
        };
        self.tables().sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>> {
        Ok(self.tables().sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn revoke_session(&self, id: Uuid) -> AppResult<()> {
        if let Some(session) = self
            .tables()
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn purge_inactive_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables();
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|s| s.user_id != user_id || s.is_active(now));
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn create_invitation(&self, invitation: NewInvitation) -> AppResult<InvitationRow> {
        let mut tables = self.tables();
        if tables.invitations.iter().any(|i| i.token == invitation.token) {
            return Err(AppError::conflict("Invitation"));
        }
        let row = InvitationRow {
            id: Uuid::new_v4(),
            company_id: invitation.company_id,
            email: invitation.email,
            role: invitation.role,
            token: invitation.token,
            invited_by: invitation.invited_by,
            created_at: Utc::now(),
            expires_at: invitation.expires_at,
            accepted_at: None,
        };
        tables.invitations.push(row.clone());
        Ok(row)
    }

    async fn find_invitation_by_token(&self, token: &str) -> AppResult<Option<InvitationRow>> {
        Ok(self
            .tables()
            .invitations
            .iter()
            .find(|i| i.token == token)
            .cloned())
    }

    async fn find_pending_invitation(
        &self,
        company_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<InvitationRow>> {
        Ok(self
            .tables()
            .invitations
            .iter()
            .find(|i| {
                i.company_id == company_id
                    && i.email == email
                    && i.accepted_at.is_none()
                    && i.expires_at > now
            })
            .cloned())
    }

    async fn list_invitations(&self, company_id: Uuid) -> AppResult<Vec<InvitationRow>> {
        let mut rows: Vec<_> = self
            .tables()
            .invitations
            .iter()
            .filter(|i| i.company_id == company_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn accept_invitation(&self, invitation_id: Uuid, user: NewUser) -> AppResult<UserRow> {
        let mut tables = self.tables();
        let index = tables
            .invitations
            .iter()
            .position(|i| i.id == invitation_id && i.accepted_at.is_none())
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;
        let row = tables.insert_user(user)?;
        tables.invitations[index].accepted_at = Some(Utc::now());
        Ok(row)
    }
}
