use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Candidate,
    Employer,
    Agency,
    /// Team member invited into a company.
    Member,
    /// Team member with permission to invite others.
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Candidate => "candidate",
            UserRole::Employer => "employer",
            UserRole::Agency => "agency",
            UserRole::Member => "member",
            UserRole::Admin => "admin",
        }
    }

    /// Roles that own a company and go through the company profile step.
    pub fn requires_company(&self) -> bool {
        matches!(self, UserRole::Employer | UserRole::Agency)
    }

    /// Roles a visitor may pick on the sign-up form.
    pub fn is_self_service(&self) -> bool {
        matches!(
            self,
            UserRole::Candidate | UserRole::Employer | UserRole::Agency
        )
    }

    /// Roles that can be granted through a team invitation.
    pub fn is_team_role(&self) -> bool {
        matches!(self, UserRole::Member | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(UserRole::Candidate),
            "employer" => Ok(UserRole::Employer),
            "agency" => Ok(UserRole::Agency),
            "member" => Ok(UserRole::Member),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub user_role: String,
    pub company_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub personal_profile_completed: bool,
    pub company_profile_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Rows are constrained by a CHECK on `user_role`; anything else is corrupt data.
    pub fn role(&self) -> anyhow::Result<UserRole> {
        self.user_role
            .parse()
            .map_err(|e: String| anyhow::anyhow!("user {}: {e}", self.id))
    }
}

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub company_profile_completed: bool,
}

/// Personal profile step of the registration wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub user_role: UserRole,
    pub company_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub personal_profile_completed: bool,
    pub company_profile_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_row(row: &UserRow) -> anyhow::Result<Self> {
        Ok(UserProfile {
            id: row.id,
            email: row.email.clone(),
            user_role: row.role()?,
            company_id: row.company_id,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            phone_number: row.phone_number.clone(),
            bio: row.bio.clone(),
            personal_profile_completed: row.personal_profile_completed,
            company_profile_completed: row.company_profile_completed,
            created_at: row.created_at,
        })
    }
}
