//! Appointment booking, lookup, and status transitions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use clinic_core::error::{AppError, codes};
use clinic_core::events::{AppointmentEvent, DomainEvent, EventPayload};
use clinic_core::traits::EventPublisher;
use clinic_core::types::pagination::{PageRequest, PageResponse};
use clinic_database::repositories::{AppointmentFilter, AppointmentRepository, HolidayRepository, UserRepository};
use clinic_entity::appointment::message::doctor_assignment_message;
use clinic_entity::appointment::{
    Appointment, AppointmentAction, AppointmentDetail, AppointmentPriority, AppointmentStatus,
    AppointmentType, AvailableAction, CreateAppointment, MessageData, StatusChange,
    authorize_action, available_actions, notification_message,
};
use clinic_entity::notification::NotificationCategory;
use clinic_entity::setting::keys;
use clinic_entity::user::{User, UserRole};

use super::booking;
use super::workflow::{self, ActionInput};
use crate::context::RequestContext;
use crate::notification::{NotificationDispatcher, OutgoingNotification};
use crate::setting::SettingsService;

const DEFAULT_MAX_OPEN: i64 = 3;

/// Data for booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub priority: Option<AppointmentPriority>,
    pub appointment_type: Option<AppointmentType>,
    pub reason: String,
}

/// Optional list filters; the caller's role narrows them further.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

/// Orchestrates the appointment workflow.
#[derive(Debug, Clone)]
pub struct AppointmentService {
    appointment_repo: Arc<AppointmentRepository>,
    user_repo: Arc<UserRepository>,
    holiday_repo: Arc<HolidayRepository>,
    settings: Arc<SettingsService>,
    dispatcher: Arc<NotificationDispatcher>,
    events: Arc<dyn EventPublisher>,
}

/// Restrict a list query to what `ctx` may see.
fn scoped_filter(ctx: &RequestContext, query: AppointmentListQuery) -> AppointmentFilter {
    let mut filter = AppointmentFilter {
        patient_id: query.patient_id,
        doctor_id: query.doctor_id,
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    match ctx.role {
        UserRole::Student | UserRole::AcademicStaff => filter.patient_id = Some(ctx.user_id),
        UserRole::Doctor => filter.doctor_id = Some(ctx.user_id),
        UserRole::ClinicalStaff | UserRole::Admin | UserRole::Superadmin => {}
    }
    filter
}

impl AppointmentService {
    /// Creates a new appointment service.
    pub fn new(
        appointment_repo: Arc<AppointmentRepository>,
        user_repo: Arc<UserRepository>,
        holiday_repo: Arc<HolidayRepository>,
        settings: Arc<SettingsService>,
        dispatcher: Arc<NotificationDispatcher>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            appointment_repo,
            user_repo,
            holiday_repo,
            settings,
            dispatcher,
            events,
        }
    }

    /// Book an appointment for the calling patient. It starts `pending`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateAppointmentRequest,
    ) -> Result<AppointmentDetail, AppError> {
        booking::ensure_patient(ctx)?;
        let patient = self.load_user(ctx.user_id).await?;
        booking::ensure_verified(&patient)?;

        let reason = booking::validate_request(&req, Utc::now().date_naive())?;
        self.ensure_bookable(req.appointment_date, "appointment_date")
            .await?;

        let max_open = self
            .settings
            .get_i64(keys::MAX_PENDING_PER_PATIENT, DEFAULT_MAX_OPEN)
            .await?;
        let open = self
            .appointment_repo
            .count_open_for_patient(ctx.user_id)
            .await?;
        booking::ensure_below_open_limit(open, max_open)?;

        let appointment = self
            .appointment_repo
            .create(&CreateAppointment {
                patient_id: ctx.user_id,
                appointment_date: req.appointment_date,
                appointment_time: req.appointment_time,
                priority: req.priority.unwrap_or_default(),
                appointment_type: req.appointment_type.unwrap_or_default(),
                reason: reason.to_string(),
            })
            .await?;

        info!(
            appointment_id = %appointment.id,
            patient_id = %ctx.user_id,
            date = %appointment.appointment_date,
            "Appointment requested"
        );

        self.events
            .publish(DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Appointment(AppointmentEvent::Created {
                    appointment_id: appointment.id,
                    patient_id: appointment.patient_id,
                }),
            ))
            .await;

        let data = MessageData {
            date: Some(appointment.appointment_date.format("%Y-%m-%d").to_string()),
            time: Some(appointment.appointment_time.format("%H:%M").to_string()),
            ..Default::default()
        };
        self.notify(
            &appointment,
            appointment.patient_id,
            notification_message(AppointmentStatus::Pending, &data),
        )
        .await;

        self.detail(ctx, appointment).await
    }

    /// List appointments visible to the caller.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: AppointmentListQuery,
        page: PageRequest,
    ) -> Result<PageResponse<Appointment>, AppError> {
        self.appointment_repo
            .find_all(&scoped_filter(ctx, query), &page)
            .await
    }

    /// One appointment with participants and the caller's actions.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<AppointmentDetail, AppError> {
        let appointment = self.load_visible(ctx, id).await?;
        self.detail(ctx, appointment).await
    }

    /// Actions the caller may take on appointment `id` right now.
    pub async fn actions(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Vec<AvailableAction>, AppError> {
        let appointment = self.load_visible(ctx, id).await?;
        Ok(available_actions(appointment.status, ctx.role))
    }

    /// Perform a workflow action and return the updated appointment.
    pub async fn perform_action(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        action: AppointmentAction,
        input: ActionInput,
    ) -> Result<AppointmentDetail, AppError> {
        let appointment = self.load(id).await?;

        let next = authorize_action(appointment.status, ctx.role, action)?;
        workflow::ensure_assigned_doctor(ctx, &appointment)?;
        workflow::validate_input(action, &input, Utc::now().date_naive())?;

        let doctor = match (action.requires_doctor(), input.doctor_id) {
            (true, Some(doctor_id)) => Some(self.load_assignable_doctor(&appointment, doctor_id).await?),
            _ => None,
        };
        if let (true, Some(date)) = (action.requires_new_slot(), input.new_date) {
            self.ensure_bookable(date, "new_date").await?;
        }

        let change = workflow::status_change(&appointment, action, next, ctx.user_id, &input);
        let updated =
            booking::require_applied(self.appointment_repo.apply_status_change(id, &change).await?)?;

        info!(
            appointment_id = %id,
            actor_id = %ctx.user_id,
            action = %action,
            from = %change.from_status,
            to = %change.to_status,
            "Appointment status changed"
        );

        self.events
            .publish(DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Appointment(AppointmentEvent::StatusChanged {
                    appointment_id: id,
                    patient_id: updated.patient_id,
                    doctor_id: updated.doctor_id,
                    action: action.to_string(),
                    from_status: change.from_status.to_string(),
                    to_status: change.to_status.to_string(),
                }),
            ))
            .await;

        self.notify_status_change(&appointment, &updated, &change, doctor.as_ref())
            .await;

        self.detail(ctx, updated).await
    }

    async fn notify_status_change(
        &self,
        before: &Appointment,
        after: &Appointment,
        change: &StatusChange,
        new_doctor: Option<&User>,
    ) {
        let doctor_name = match (new_doctor, after.doctor_id) {
            (Some(doctor), _) => Some(doctor.full_name.clone()),
            (None, Some(doctor_id)) => self
                .user_repo
                .find_by_id(doctor_id)
                .await
                .ok()
                .flatten()
                .map(|d| d.full_name),
            (None, None) => None,
        };

        let data = workflow::message_data(before, change, doctor_name);
        self.notify(
            after,
            after.patient_id,
            notification_message(change.to_status, &data),
        )
        .await;

        if let Some(doctor) = new_doctor {
            let patient_name = match self.user_repo.find_by_id(after.patient_id).await {
                Ok(Some(patient)) => patient.full_name,
                _ => "a patient".to_string(),
            };
            self.notify(
                after,
                doctor.id,
                doctor_assignment_message(&patient_name, &data),
            )
            .await;
        }
    }

    /// Queue a notification; failures are logged, never returned.
    async fn notify(
        &self,
        appointment: &Appointment,
        user_id: Uuid,
        message: clinic_entity::appointment::NotificationMessage,
    ) {
        let outgoing = OutgoingNotification {
            user_id,
            category: NotificationCategory::Appointment,
            message,
            context: json!({
                "appointment_id": appointment.id,
                "status": appointment.status,
            }),
        };
        if let Err(e) = self.dispatcher.dispatch(&outgoing).await {
            warn!(
                appointment_id = %appointment.id,
                user_id = %user_id,
                error = %e,
                "Failed to queue appointment notification"
            );
        }
    }

    async fn ensure_bookable(&self, date: NaiveDate, field: &str) -> Result<(), AppError> {
        let enabled = self
            .settings
            .get_bool(keys::BLOCK_ON_HOLIDAYS, true)
            .await?;
        let blocking = if enabled {
            self.holiday_repo.find_blocking_on(date).await?
        } else {
            Vec::new()
        };
        booking::ensure_date_open(enabled, date, field, &blocking)
    }

    async fn load_assignable_doctor(
        &self,
        appointment: &Appointment,
        doctor_id: Uuid,
    ) -> Result<User, AppError> {
        if appointment.doctor_id == Some(doctor_id) {
            return Err(AppError::invalid_field(
                "doctor_id",
                "The appointment is already assigned to this doctor",
            ));
        }
        match self.user_repo.find_by_id(doctor_id).await? {
            Some(user) if user.is_available_doctor() => Ok(user),
            _ => Err(AppError::invalid_field(
                "doctor_id",
                "The selected user is not an active doctor",
            )),
        }
    }

    async fn load(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment {id} not found")))
    }

    async fn load_visible(&self, ctx: &RequestContext, id: Uuid) -> Result<Appointment, AppError> {
        let appointment = self.load(id).await?;
        if workflow::can_view(ctx, &appointment) {
            Ok(appointment)
        } else {
            Err(AppError::forbidden(
                codes::NOT_RESOURCE_OWNER,
                "You do not have access to this appointment",
            ))
        }
    }

    async fn load_user(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn detail(
        &self,
        ctx: &RequestContext,
        appointment: Appointment,
    ) -> Result<AppointmentDetail, AppError> {
        let ids: Vec<Uuid> = std::iter::once(appointment.patient_id)
            .chain(appointment.doctor_id)
            .collect();
        let users: HashMap<Uuid, User> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let actions = if workflow::ensure_assigned_doctor(ctx, &appointment).is_ok() {
            available_actions(appointment.status, ctx.role)
        } else {
            Vec::new()
        };

        Ok(AppointmentDetail {
            patient: users.get(&appointment.patient_id).map(User::summary),
            doctor: appointment
                .doctor_id
                .and_then(|id| users.get(&id))
                .map(User::summary),
            available_actions: actions,
            appointment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_filter_is_forced_to_self() {
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::Student, "s@uni.edu.tr".into());
        let query = AppointmentListQuery {
            patient_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(scoped_filter(&ctx, query).patient_id, Some(ctx.user_id));
    }

    #[test]
    fn test_doctor_filter_is_forced_to_self() {
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::Doctor, "d@uni.edu.tr".into());
        let filter = scoped_filter(&ctx, AppointmentListQuery::default());
        assert_eq!(filter.doctor_id, Some(ctx.user_id));
        assert!(filter.patient_id.is_none());
    }

    #[test]
    fn test_staff_filter_passes_through() {
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::ClinicalStaff, "c@uni.edu.tr".into());
        let query = AppointmentListQuery {
            status: Some(AppointmentStatus::Pending),
            ..Default::default()
        };
        let filter = scoped_filter(&ctx, query);
        assert_eq!(filter.status, Some(AppointmentStatus::Pending));
        assert!(filter.patient_id.is_none() && filter.doctor_id.is_none());
    }
}
