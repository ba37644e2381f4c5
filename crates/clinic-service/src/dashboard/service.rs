//! Aggregates counts for the caller's dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use clinic_core::error::AppError;
use clinic_database::repositories::{AppointmentRepository, NotificationRepository, UserRepository};
use clinic_entity::appointment::AppointmentStatus;
use clinic_entity::user::UserRole;

use crate::context::RequestContext;

/// Dashboard payload, tagged by `view`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Dashboard {
    Patient {
        appointments_by_status: BTreeMap<String, i64>,
        open_appointments: i64,
        unread_notifications: i64,
    },
    ClinicalStaff {
        pending: i64,
        under_review: i64,
        assigned: i64,
        unread_notifications: i64,
    },
    Doctor {
        assigned: i64,
        confirmed: i64,
        rescheduled: i64,
        completed: i64,
        unread_notifications: i64,
    },
    Admin {
        users_by_role: BTreeMap<String, i64>,
        appointments_by_status: BTreeMap<String, i64>,
    },
}

/// Builds dashboards from repository counts.
#[derive(Debug, Clone)]
pub struct DashboardService {
    appointment_repo: Arc<AppointmentRepository>,
    user_repo: Arc<UserRepository>,
    notif_repo: Arc<NotificationRepository>,
}

/// Every status with its count, zero when absent.
fn by_status(rows: &[(AppointmentStatus, i64)]) -> BTreeMap<String, i64> {
    AppointmentStatus::ALL
        .into_iter()
        .map(|status| {
            let count = rows
                .iter()
                .find(|(s, _)| *s == status)
                .map_or(0, |(_, n)| *n);
            (status.to_string(), count)
        })
        .collect()
}

fn count_of(rows: &[(AppointmentStatus, i64)], status: AppointmentStatus) -> i64 {
    rows.iter()
        .find(|(s, _)| *s == status)
        .map_or(0, |(_, n)| *n)
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(
        appointment_repo: Arc<AppointmentRepository>,
        user_repo: Arc<UserRepository>,
        notif_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            appointment_repo,
            user_repo,
            notif_repo,
        }
    }

    /// The dashboard for the caller's role.
    pub async fn for_user(&self, ctx: &RequestContext) -> Result<Dashboard, AppError> {
        match ctx.role {
            UserRole::Student | UserRole::AcademicStaff => {
                let rows = self
                    .appointment_repo
                    .count_by_status(Some(ctx.user_id), None)
                    .await?;
                let open = rows
                    .iter()
                    .filter(|(s, _)| s.is_active())
                    .map(|(_, n)| n)
                    .sum();
                Ok(Dashboard::Patient {
                    appointments_by_status: by_status(&rows),
                    open_appointments: open,
                    unread_notifications: self.notif_repo.count_unread(ctx.user_id).await?,
                })
            }
            UserRole::ClinicalStaff => {
                let rows = self.appointment_repo.count_by_status(None, None).await?;
                Ok(Dashboard::ClinicalStaff {
                    pending: count_of(&rows, AppointmentStatus::Pending),
                    under_review: count_of(&rows, AppointmentStatus::UnderReview),
                    assigned: count_of(&rows, AppointmentStatus::Assigned),
                    unread_notifications: self.notif_repo.count_unread(ctx.user_id).await?,
                })
            }
            UserRole::Doctor => {
                let rows = self
                    .appointment_repo
                    .count_by_status(None, Some(ctx.user_id))
                    .await?;
                Ok(Dashboard::Doctor {
                    assigned: count_of(&rows, AppointmentStatus::Assigned),
                    confirmed: count_of(&rows, AppointmentStatus::Confirmed),
                    rescheduled: count_of(&rows, AppointmentStatus::Rescheduled),
                    completed: count_of(&rows, AppointmentStatus::Completed),
                    unread_notifications: self.notif_repo.count_unread(ctx.user_id).await?,
                })
            }
            UserRole::Admin | UserRole::Superadmin => {
                let users = self.user_repo.count_by_role().await?;
                let rows = self.appointment_repo.count_by_status(None, None).await?;
                Ok(Dashboard::Admin {
                    users_by_role: UserRole::ALL
                        .into_iter()
                        .map(|role| {
                            let n = users.iter().find(|(r, _)| *r == role).map_or(0, |(_, n)| *n);
                            (role.to_string(), n)
                        })
                        .collect(),
                    appointments_by_status: by_status(&rows),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_status_zero_fills() {
        let rows = vec![(AppointmentStatus::Pending, 4), (AppointmentStatus::Completed, 2)];
        let map = by_status(&rows);
        assert_eq!(map.len(), 8);
        assert_eq!(map["pending"], 4);
        assert_eq!(map["completed"], 2);
        assert_eq!(map["cancelled"], 0);
    }

    #[test]
    fn test_dashboard_tag() {
        let json = serde_json::to_value(Dashboard::Doctor {
            assigned: 1,
            confirmed: 2,
            rescheduled: 0,
            completed: 5,
            unread_notifications: 3,
        })
        .unwrap();
        assert_eq!(json["view"], "doctor");
        assert_eq!(json["completed"], 5);
    }
}
