//! Dashboard handler.

use axum::Json;
use axum::extract::State;

use clinic_core::error::AppError;
use clinic_service::dashboard::Dashboard;

use crate::dto::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let dashboard = state.dashboard_service.for_user(&auth).await?;
    Ok(Json(ApiResponse::ok(dashboard)))
}
