//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use clinic_auth::jwt::TokenPair;
use clinic_core::error::AppError;
use clinic_entity::user::User;
use clinic_service::user::LoginResponse;

use crate::dto::ApiResponse;
use crate::dto::request::{LoginBody, LogoutBody, RefreshBody, RegisterBody};
use crate::dto::response::MessageResponse;
use crate::extractors::{AuthUser, OptionalJson, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterBody>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.auth_service.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginBody>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let result = state.auth_service.login(&body.email, &body.password).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshBody>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = state.auth_service.refresh(&body.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalJson(body): OptionalJson<LogoutBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .auth_service
        .logout(&auth.claims, body.refresh_token.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.auth_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}
