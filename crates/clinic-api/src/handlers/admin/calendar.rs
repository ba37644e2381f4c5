//! Manual academic calendar sync.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use clinic_auth::rbac::Permission;
use clinic_core::error::AppError;
use clinic_service::calendar::{SyncReport, current_academic_start};

use crate::dto::ApiResponse;
use crate::dto::request::CalendarSyncBody;
use crate::extractors::body::validation_error;
use crate::extractors::{AuthUser, OptionalJson};
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// POST /api/admin/calendar/sync
///
/// Runs the sync inline; without a year, the current academic year is used.
pub async fn sync_now(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalJson(body): OptionalJson<CalendarSyncBody>,
) -> Result<Json<ApiResponse<SyncReport>>, AppError> {
    require_permission(&state, &auth, Permission::CalendarSync)?;
    body.validate().map_err(validation_error)?;

    let year = body
        .year
        .unwrap_or_else(|| current_academic_start(Utc::now().date_naive()));
    info!(admin_id = %auth.user_id, year, "Manual calendar sync requested");

    let report = state.calendar_sync.sync(year).await;
    if let Err(e) = state.sync_reports.record(&report).await {
        warn!(year, error = %e, "Failed to record calendar sync report");
    }
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/admin/calendar/sync/{year}
pub async fn last_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    require_permission(&state, &auth, Permission::CalendarSync)?;
    let report = state
        .sync_reports
        .last(year)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No calendar sync report for {year}")))?;
    Ok(Json(ApiResponse::ok(report)))
}
