pub mod health;
pub mod landing;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::registration::handlers as registration;
use crate::state::AppState;
use crate::team::handlers as team;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Registration wizard
        .route("/api/v1/registration", get(registration::handle_status))
        .route(
            "/api/v1/registration/personal-profile",
            put(registration::handle_personal_profile),
        )
        .route(
            "/api/v1/registration/company-profile",
            post(registration::handle_company_profile),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Team
        .route(
            "/api/v1/companies/:company_id/invitations",
            post(team::handle_invite).get(team::handle_list_invitations),
        )
        .route(
            "/api/v1/companies/:company_id/members",
            get(team::handle_list_members),
        )
        .route("/api/v1/invitations/accept", post(team::handle_accept))
        .with_state(state)
}
