use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{blank_as_none, ValidatedJson};
use crate::models::company::CompanyProfile;
use crate::models::user::PersonalProfile;
use crate::registration::service::{self, CompanyProfileResponse};
use crate::registration::wizard::RegistrationStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PersonalProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

impl From<PersonalProfileRequest> for PersonalProfile {
    fn from(req: PersonalProfileRequest) -> Self {
        PersonalProfile {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            bio: req.bio,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyProfileRequest {
    #[validate(length(min = 1, max = 200, message = "Company name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Industry must be at most 100 characters"))]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(length(max = 50, message = "Company size must be at most 50 characters"))]
    pub company_size: Option<String>,
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

impl From<CompanyProfileRequest> for CompanyProfile {
    fn from(req: CompanyProfileRequest) -> Self {
        CompanyProfile {
            name: req.name,
            industry: req.industry,
            website: req.website,
            company_size: req.company_size,
            location: req.location,
            description: req.description,
        }
    }
}

/// GET /api/v1/registration
pub async fn handle_status(auth: AuthUser) -> Result<Json<RegistrationStatus>, AppError> {
    Ok(Json(service::status(&auth)?))
}

/// PUT /api/v1/registration/personal-profile
pub async fn handle_personal_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PersonalProfileRequest>,
) -> Result<Json<RegistrationStatus>, AppError> {
    let status =
        service::submit_personal_profile(state.store.as_ref(), &auth, req.into()).await?;
    Ok(Json(status))
}

/// POST /api/v1/registration/company-profile
pub async fn handle_company_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CompanyProfileRequest>,
) -> Result<(StatusCode, Json<CompanyProfileResponse>), AppError> {
    let resp = service::submit_company_profile(state.store.as_ref(), &auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
