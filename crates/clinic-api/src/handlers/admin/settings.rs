//! System settings handlers.

use axum::Json;
use axum::extract::{Path, State};

use clinic_auth::rbac::Permission;
use clinic_core::error::AppError;
use clinic_entity::setting::Setting;

use crate::dto::ApiResponse;
use crate::dto::request::SettingBody;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// GET /api/admin/settings
pub async fn list_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Setting>>>, AppError> {
    require_permission(&state, &auth, Permission::SettingsManage)?;
    let settings = state.settings_service.list().await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// PUT /api/admin/settings/{key}
pub async fn update_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(body): Json<SettingBody>,
) -> Result<Json<ApiResponse<Setting>>, AppError> {
    require_permission(&state, &auth, Permission::SettingsManage)?;
    let setting = state
        .settings_service
        .update(&auth, &key, body.value)
        .await?;
    Ok(Json(ApiResponse::ok(setting)))
}
