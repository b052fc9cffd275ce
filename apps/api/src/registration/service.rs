use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::extract::{optional_text, required_text};
use crate::models::company::{CompanyProfile, CompanyRow};
use crate::models::user::PersonalProfile;
use crate::registration::wizard::{step_for, RegistrationStatus, RegistrationStep};
use crate::store::Store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfileResponse {
    pub company: CompanyRow,
    pub registration: RegistrationStatus,
}

pub fn status(auth: &AuthUser) -> AppResult<RegistrationStatus> {
    Ok(step_for(&auth.user)?.into())
}

pub async fn submit_personal_profile(
    store: &dyn Store,
    auth: &AuthUser,
    profile: PersonalProfile,
) -> AppResult<RegistrationStatus> {
    let profile = PersonalProfile {
        first_name: required_text("first_name", &profile.first_name)?,
        last_name: required_text("last_name", &profile.last_name)?,
        phone_number: optional_text(profile.phone_number),
        bio: optional_text(profile.bio),
    };

    let user = store.update_personal_profile(auth.user.id, &profile).await?;
    let step = step_for(&user)?;
    info!("User {} completed personal profile; next step {step:?}", user.id);
    Ok(step.into())
}

pub async fn submit_company_profile(
    store: &dyn Store,
    auth: &AuthUser,
    profile: CompanyProfile,
) -> AppResult<CompanyProfileResponse> {
    if !auth.role.requires_company() {
        return Err(AppError::Forbidden);
    }
    if !auth.user.personal_profile_completed {
        return Err(AppError::RegistrationIncomplete(
            RegistrationStep::PersonalProfile,
        ));
    }
    if auth.user.company_profile_completed || auth.user.company_id.is_some() {
        return Err(AppError::conflict("Company profile"));
    }

    let profile = CompanyProfile {
        name: required_text("name", &profile.name)?,
        industry: optional_text(profile.industry),
        website: optional_text(profile.website),
        company_size: optional_text(profile.company_size),
        location: optional_text(profile.location),
        description: optional_text(profile.description),
    };

    let (company, owner) = store.create_owned_company(auth.user.id, &profile).await?;
    Ok(CompanyProfileResponse {
        company,
        registration: step_for(&owner)?.into(),
    })
}
