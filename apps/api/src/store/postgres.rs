use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::company::{CompanyProfile, CompanyRow};
use crate::models::invitation::{InvitationRow, NewInvitation};
use crate::models::session::SessionRow;
use crate::models::user::{NewUser, PersonalProfile, UserRow};
use crate::store::Store;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `Conflict(entity)`.
fn unique_as_conflict(entity: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(entity),
        _ => AppError::Database(err),
    }
}

const INSERT_USER: &str = r#"
    INSERT INTO users
        (id, email, password_hash, user_role, company_id, company_profile_completed)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING *
"#;

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> AppResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.company_id)
            .bind(user.company_profile_completed)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as_conflict("User"))?;

        info!("Created user {} with role {}", row.id, row.user_role);
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_personal_profile(
        &self,
        user_id: Uuid,
        profile: &PersonalProfile,
    ) -> AppResult<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = $1,
                last_name = $2,
                phone_number = $3,
                bio = $4,
                personal_profile_completed = TRUE,
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone_number)
        .bind(&profile.bio)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    async fn create_owned_company(
        &self,
        owner_id: Uuid,
        profile: &CompanyProfile,
    ) -> AppResult<(CompanyRow, UserRow)> {
        let mut tx = self.pool.begin().await?;

        let company = sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies
                (id, owner_id, name, industry, website, company_size, location, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&profile.name)
        .bind(&profile.industry)
        .bind(&profile.website)
        .bind(&profile.company_size)
        .bind(&profile.location)
        .bind(&profile.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_as_conflict("Company profile"))?;

        let owner = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET company_id = $1,
                company_profile_completed = TRUE,
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Created company {} owned by user {owner_id}", company.id);
        Ok((company, owner))
    }

    async fn find_company(&self, id: Uuid) -> AppResult<Option<CompanyRow>> {
        Ok(
            sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_company_members(&self, company_id: Uuid) -> AppResult<Vec<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE company_id = $1 ORDER BY created_at ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<SessionRow> {
        Ok(sqlx::query_as::<_, SessionRow>(
            "INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>> {
        Ok(
            sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn revoke_session(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purge_inactive_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE user_id = $1 AND (revoked_at IS NOT NULL OR expires_at <= $2)",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn create_invitation(&self, invitation: NewInvitation) -> AppResult<InvitationRow> {
        Ok(sqlx::query_as::<_, InvitationRow>(
            r#"
            INSERT INTO invitations
                (id, company_id, email, role, token, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invitation.company_id)
        .bind(&invitation.email)
        .bind(&invitation.role)
        .bind(&invitation.token)
        .bind(invitation.invited_by)
        .bind(invitation.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_as_conflict("Invitation"))?)
    }

    async fn find_invitation_by_token(&self, token: &str) -> AppResult<Option<InvitationRow>> {
        Ok(
            sqlx::query_as::<_, InvitationRow>("SELECT * FROM invitations WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_pending_invitation(
        &self,
        company_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<InvitationRow>> {
        Ok(sqlx::query_as::<_, InvitationRow>(
            r#"
            SELECT * FROM invitations
            WHERE company_id = $1
              AND email = $2
              AND accepted_at IS NULL
              AND expires_at > $3
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .bind(email)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_invitations(&self, company_id: Uuid) -> AppResult<Vec<InvitationRow>> {
        Ok(sqlx::query_as::<_, InvitationRow>(
            "SELECT * FROM invitations WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn accept_invitation(&self, invitation_id: Uuid, user: NewUser) -> AppResult<UserRow> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE invitations
            SET accepted_at = NOW()
            WHERE id = $1 AND accepted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            return Err(AppError::not_found("Invitation not found"));
        }

        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.company_id)
            .bind(user.company_profile_completed)
            .fetch_one(&mut *tx)
            .await
            .map_err(unique_as_conflict("User"))?;

        tx.commit().await?;

        info!(
            "Invitation {invitation_id} accepted; created user {} in company {:?}",
            row.id, row.company_id
        );
        Ok(row)
    }
}
