//! Medical record handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use clinic_auth::rbac::Permission;
use clinic_core::error::AppError;
use clinic_entity::medical_record::MedicalRecord;

use crate::dto::ApiResponse;
use crate::dto::request::MedicalRecordBody;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// GET /api/medical-records
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<MedicalRecord>>>, AppError> {
    let records = state.medical_record_service.list_own(&auth).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// GET /api/patients/{id}/medical-records
pub async fn list_for_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MedicalRecord>>>, AppError> {
    let records = state
        .medical_record_service
        .list_for_patient(&auth, patient_id)
        .await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// POST /api/appointments/{id}/medical-record
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(appointment_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<MedicalRecordBody>,
) -> Result<(StatusCode, Json<ApiResponse<MedicalRecord>>), AppError> {
    require_permission(&state, &auth, Permission::MedicalRecordWrite)?;
    let record = state
        .medical_record_service
        .create(&auth, appointment_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}
