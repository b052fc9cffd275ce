use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::dashboard::view::{load_dashboard, Dashboard};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(load_dashboard(state.store.as_ref(), &auth).await?))
}
