//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use clinic_auth::rbac::Permission;
use clinic_core::error::AppError;
use clinic_core::types::pagination::PageResponse;
use clinic_entity::user::User;

use crate::dto::ApiResponse;
use crate::dto::request::{CreateUserBody, UserListParams, UserStatusBody};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<UserListParams>,
) -> Result<Json<ApiResponse<PageResponse<User>>>, AppError> {
    require_permission(&state, &auth, Permission::UserManage)?;
    let page = params.page_request();
    let result = state.admin_user_service.list_users(params.role, page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    require_permission(&state, &auth, Permission::UserManage)?;
    let user = state.admin_user_service.create_user(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PUT /api/admin/users/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UserStatusBody>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    require_permission(&state, &auth, Permission::UserManage)?;
    let user = state
        .admin_user_service
        .set_status(&auth, id, body.status)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/admin/users/{id}/verify
pub async fn verify_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    require_permission(&state, &auth, Permission::UserManage)?;
    let user = state.admin_user_service.verify_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
