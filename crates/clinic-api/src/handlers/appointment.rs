//! Appointment handlers: booking, lookup, workflow rules, and actions.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use clinic_auth::rbac::Permission;
use clinic_core::error::{AppError, codes};
use clinic_core::types::pagination::PageResponse;
use clinic_entity::appointment::{
    Appointment, AppointmentAction, AppointmentDetail, AppointmentStatus, AvailableAction,
    action_catalogue, can_transition_to, transition_table,
};
use clinic_service::appointment::ActionInput;

use crate::dto::ApiResponse;
use crate::dto::request::{AppointmentListParams, CreateAppointmentBody, TransitionCheckParams};
use crate::dto::response::{TransitionCheckResponse, WorkflowResponse};
use crate::extractors::{AuthUser, OptionalJson, ValidatedJson};
use crate::middleware::rbac::{require_any, require_permission};
use crate::state::AppState;

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<AppointmentListParams>,
) -> Result<Json<ApiResponse<PageResponse<Appointment>>>, AppError> {
    require_any(
        &state,
        &auth,
        &[
            Permission::AppointmentReadOwn,
            Permission::AppointmentReadAssigned,
            Permission::AppointmentReadAll,
        ],
    )?;
    let (query, page) = params.into_parts();
    let result = state.appointment_service.list(&auth, query, page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateAppointmentBody>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentDetail>>), AppError> {
    require_permission(&state, &auth, Permission::AppointmentBook)?;
    let detail = state.appointment_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(detail))))
}

/// GET /api/appointments/{id}
pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentDetail>>, AppError> {
    let detail = state.appointment_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /api/appointments/workflow
///
/// Public: the rules are the same for everyone.
pub async fn workflow() -> Json<ApiResponse<WorkflowResponse>> {
    Json(ApiResponse::ok(WorkflowResponse {
        transitions: transition_table(),
        actions: action_catalogue(),
    }))
}

/// GET /api/appointments/transitions/check?from=&to=
pub async fn check_transition(
    Query(params): Query<TransitionCheckParams>,
) -> Result<Json<ApiResponse<TransitionCheckResponse>>, AppError> {
    let from: AppointmentStatus = params
        .from
        .parse()
        .map_err(|_| AppError::invalid_field("from", format!("Unknown status '{}'", params.from)))?;
    let to: AppointmentStatus = params
        .to
        .parse()
        .map_err(|_| AppError::invalid_field("to", format!("Unknown status '{}'", params.to)))?;

    Ok(Json(ApiResponse::ok(TransitionCheckResponse {
        from,
        to,
        allowed: can_transition_to(from, to),
    })))
}

/// GET /api/appointments/{id}/actions
pub async fn list_actions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AvailableAction>>>, AppError> {
    let actions = state.appointment_service.actions(&auth, id).await?;
    Ok(Json(ApiResponse::ok(actions)))
}

/// POST /api/appointments/{id}/actions/{action}
pub async fn perform_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, action)): Path<(Uuid, String)>,
    OptionalJson(input): OptionalJson<ActionInput>,
) -> Result<Json<ApiResponse<AppointmentDetail>>, AppError> {
    let action: AppointmentAction = action.parse()?;
    require_permission(&state, &auth, Permission::AppointmentAct)
        .map_err(|_| role_mismatch(action))?;

    let detail = state
        .appointment_service
        .perform_action(&auth, id, action, input)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// Denial for roles that never take workflow actions.
fn role_mismatch(action: AppointmentAction) -> AppError {
    AppError::forbidden(
        codes::ROLE_MISMATCH,
        format!(
            "Action '{action}' can only be performed by {}",
            action.performed_by()
        ),
    )
}
