//! Academic holiday lookups.

use axum::Json;
use axum::extract::{Query, State};

use clinic_core::error::AppError;
use clinic_entity::holiday::AcademicHoliday;
use clinic_service::calendar::HolidayCheck;

use crate::dto::ApiResponse;
use crate::dto::request::{HolidayCheckParams, HolidayListParams};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/holidays?academic_year=
pub async fn list_holidays(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<HolidayListParams>,
) -> Result<Json<ApiResponse<Vec<AcademicHoliday>>>, AppError> {
    let holidays = state
        .holiday_service
        .list(params.academic_year.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(holidays)))
}

/// GET /api/holidays/check?date=
pub async fn check_date(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<HolidayCheckParams>,
) -> Result<Json<ApiResponse<HolidayCheck>>, AppError> {
    let check = state.holiday_service.check(params.date).await?;
    Ok(Json(ApiResponse::ok(check)))
}
