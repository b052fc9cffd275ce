use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::models::company::CompanyRow;
use crate::models::user::UserRole;
use crate::registration::wizard::{step_for, RegistrationStep};
use crate::store::Store;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    Employer,
    Agency,
    Candidate,
    TeamMember,
}

impl From<UserRole> for DashboardKind {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Employer => DashboardKind::Employer,
            UserRole::Agency => DashboardKind::Agency,
            UserRole::Candidate => DashboardKind::Candidate,
            UserRole::Member | UserRole::Admin => DashboardKind::TeamMember,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub email: String,
    pub user_role: UserRole,
    pub kind: DashboardKind,
    pub display_name: Option<String>,
    pub company: Option<CompanyRow>,
    pub can_invite: bool,
}

/// Whether `role` may invite people into `company`, given who owns it.
pub fn can_invite(role: UserRole, user_id: Uuid, company: Option<&CompanyRow>) -> bool {
    match (role, company) {
        (UserRole::Employer | UserRole::Agency, Some(c)) => c.owner_id == user_id,
        (UserRole::Admin, Some(_)) => true,
        _ => false,
    }
}

pub async fn load_dashboard(store: &dyn Store, auth: &AuthUser) -> AppResult<Dashboard> {
    let step = step_for(&auth.user)?;
    if step != RegistrationStep::Complete {
        return Err(AppError::RegistrationIncomplete(step));
    }

    let company = match auth.user.company_id {
        Some(id) => store.find_company(id).await?,
        None => None,
    };

    let display_name = match (&auth.user.first_name, &auth.user.last_name) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(first), None) => Some(first.clone()),
        _ => None,
    };

    Ok(Dashboard {
        email: auth.user.email.clone(),
        user_role: auth.role,
        kind: auth.role.into(),
        display_name,
        can_invite: can_invite(auth.role, auth.user.id, company.as_ref()),
        company,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn company(owner_id: Uuid) -> CompanyRow {
        CompanyRow {
            id: Uuid::new_v4(),
            owner_id,
            name: "Acme".to_string(),
            industry: None,
            website: None,
            company_size: None,
            location: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_follows_role() {
        assert_eq!(DashboardKind::from(UserRole::Employer), DashboardKind::Employer);
        assert_eq!(DashboardKind::from(UserRole::Agency), DashboardKind::Agency);
        assert_eq!(DashboardKind::from(UserRole::Candidate), DashboardKind::Candidate);
        assert_eq!(DashboardKind::from(UserRole::Member), DashboardKind::TeamMember);
        assert_eq!(DashboardKind::from(UserRole::Admin), DashboardKind::TeamMember);
    }

    #[test]
    fn test_only_owners_and_admins_invite() {
        let owner = Uuid::new_v4();
        let acme = company(owner);

        assert!(can_invite(UserRole::Employer, owner, Some(&acme)));
        assert!(!can_invite(UserRole::Employer, Uuid::new_v4(), Some(&acme)));
        assert!(can_invite(UserRole::Admin, Uuid::new_v4(), Some(&acme)));
        assert!(!can_invite(UserRole::Member, Uuid::new_v4(), Some(&acme)));
        assert!(!can_invite(UserRole::Candidate, owner, Some(&acme)));
        assert!(!can_invite(UserRole::Agency, owner, None));
    }
}
