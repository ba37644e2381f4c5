//! Request DTOs with validation.
//!
//! Bodies are checked field by field here; business rules (password
//! strength, booking limits, workflow stage) stay in the services.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use clinic_core::types::pagination::PageRequest;
use clinic_entity::appointment::{AppointmentPriority, AppointmentStatus, AppointmentType};
use clinic_entity::user::{UserRole, UserStatus};
use clinic_service::appointment::{AppointmentListQuery, CreateAppointmentRequest};
use clinic_service::medical_record::CreateMedicalRecordRequest;
use clinic_service::user::{CreateStaffRequest, RegisterRequest};

/// Self-registration body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterBody {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: String,
    #[validate(length(max = 50))]
    pub institution_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub department: Option<String>,
    pub role: UserRole,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            institution_number: body.institution_number,
            phone: body.phone,
            department: body.department,
            role: body.role,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginBody {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshBody {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Optional logout body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutBody {
    /// Also revoke this refresh token.
    pub refresh_token: Option<String>,
}

/// Booking body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAppointmentBody {
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub priority: Option<AppointmentPriority>,
    pub appointment_type: Option<AppointmentType>,
    #[validate(length(min = 3, max = 2000, message = "Reason must be 3-2000 characters"))]
    pub reason: String,
}

impl From<CreateAppointmentBody> for CreateAppointmentRequest {
    fn from(body: CreateAppointmentBody) -> Self {
        Self {
            appointment_date: body.appointment_date,
            appointment_time: body.appointment_time,
            priority: body.priority,
            appointment_type: body.appointment_type,
            reason: body.reason,
        }
    }
}

/// Appointment list filters plus paging, all from the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListParams {
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AppointmentListParams {
    /// Split into service filters and a page request.
    pub fn into_parts(self) -> (AppointmentListQuery, PageRequest) {
        let page = page_request(self.page, self.per_page);
        let query = AppointmentListQuery {
            status: self.status,
            date_from: self.date_from,
            date_to: self.date_to,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
        };
        (query, page)
    }
}

/// `?from=&to=` for the transition check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCheckParams {
    pub from: String,
    pub to: String,
}

/// Notification list query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl NotificationListParams {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.per_page)
    }
}

/// `?academic_year=2025-2026`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayListParams {
    pub academic_year: Option<String>,
}

/// `?date=2025-10-29`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCheckParams {
    pub date: NaiveDate,
}

/// Medical record body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MedicalRecordBody {
    #[validate(length(min = 1, max = 5000, message = "Diagnosis is required"))]
    pub diagnosis: String,
    #[validate(length(max = 5000))]
    pub treatment: Option<String>,
    #[validate(length(max = 5000))]
    pub prescription: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl From<MedicalRecordBody> for CreateMedicalRecordRequest {
    fn from(body: MedicalRecordBody) -> Self {
        Self {
            diagnosis: body.diagnosis,
            treatment: body.treatment,
            prescription: body.prescription,
            notes: body.notes,
        }
    }
}

/// Admin account creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserBody {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: String,
    #[validate(length(max = 50))]
    pub institution_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub department: Option<String>,
    pub role: UserRole,
}

impl From<CreateUserBody> for CreateStaffRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            institution_number: body.institution_number,
            phone: body.phone,
            department: body.department,
            role: body.role,
        }
    }
}

/// Admin user list query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListParams {
    pub role: Option<UserRole>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl UserListParams {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.per_page)
    }
}

/// Activate or deactivate an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusBody {
    pub status: UserStatus,
}

/// New value for a setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingBody {
    pub value: Value,
}

/// Optional year for a manual calendar sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CalendarSyncBody {
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: Option<i32>,
}

fn page_request(page: Option<u64>, per_page: Option<u64>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest::new(
        page.unwrap_or(defaults.page),
        per_page.unwrap_or(defaults.page_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_split() {
        let params = AppointmentListParams {
            status: Some(AppointmentStatus::Pending),
            per_page: Some(500),
            ..Default::default()
        };
        let (query, page) = params.into_parts();
        assert_eq!(query.status, Some(AppointmentStatus::Pending));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn test_calendar_year_range() {
        assert!(CalendarSyncBody { year: Some(2025) }.validate().is_ok());
        assert!(CalendarSyncBody { year: None }.validate().is_ok());
        assert!(CalendarSyncBody { year: Some(1925) }.validate().is_err());
    }

    #[test]
    fn test_register_body_reports_each_field() {
        let body = RegisterBody {
            email: "not-an-email".into(),
            password: String::new(),
            full_name: "A".into(),
            institution_number: None,
            phone: None,
            department: None,
            role: UserRole::Student,
        };
        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("full_name"));
    }
}
