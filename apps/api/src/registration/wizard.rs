//! Registration wizard.
//!
//! The next step is derived from persisted state only: the stored role and
//! the two profile-completion flags. Clients never tell the server which
//! step they are on.

use serde::{Deserialize, Serialize};

use crate::models::user::{UserRole, UserRow};

/// Web client page shown once registration is complete. The data behind it
/// is served by `GET /api/v1/dashboard`.
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    SignUp,
    PersonalProfile,
    CompanyProfile,
    Complete,
}

impl RegistrationStep {
    /// Position in the wizard; `None` once registration is complete.
    pub fn number(&self) -> Option<u8> {
        match self {
            RegistrationStep::SignUp => Some(1),
            RegistrationStep::PersonalProfile => Some(2),
            RegistrationStep::CompanyProfile => Some(3),
            RegistrationStep::Complete => None,
        }
    }

    pub fn pending_message(&self) -> &'static str {
        match self {
            RegistrationStep::SignUp => "Sign up or sign in first",
            RegistrationStep::PersonalProfile => "Complete your personal profile first",
            RegistrationStep::CompanyProfile => "Complete your company profile first",
            RegistrationStep::Complete => "Registration is already complete",
        }
    }
}

pub fn next_step(role: UserRole, personal_completed: bool, company_completed: bool) -> RegistrationStep {
    if !personal_completed {
        RegistrationStep::PersonalProfile
    } else if !company_completed && role.requires_company() {
        RegistrationStep::CompanyProfile
    } else {
        RegistrationStep::Complete
    }
}

pub fn step_for(user: &UserRow) -> anyhow::Result<RegistrationStep> {
    Ok(next_step(
        user.role()?,
        user.personal_profile_completed,
        user.company_profile_completed,
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationStatus {
    pub step: RegistrationStep,
    pub step_number: Option<u8>,
    pub redirect_to: Option<String>,
}

impl From<RegistrationStep> for RegistrationStatus {
    fn from(step: RegistrationStep) -> Self {
        RegistrationStatus {
            step,
            step_number: step.number(),
            redirect_to: (step == RegistrationStep::Complete).then(|| DASHBOARD_PATH.to_string()),
        }
    }
}
