//! Role-gated action catalogue for the appointment workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use clinic_core::AppError;
use clinic_core::error::codes;

use super::status::AppointmentStatus;
use crate::user::UserRole;

/// An operation a staff member can perform on an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentAction {
    /// pending → under_review
    StartReview,
    /// under_review → assigned
    Assign,
    /// under_review or assigned → rejected
    Reject,
    /// assigned → assigned with a different doctor
    Reassign,
    /// assigned or rescheduled → confirmed
    Confirm,
    /// assigned → rescheduled
    Reschedule,
    /// confirmed → completed
    Complete,
    /// confirmed or rescheduled → cancelled
    Cancel,
}

/// Button style hint for frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Primary,
    Success,
    Warning,
    Danger,
    Secondary,
}

impl AppointmentAction {
    /// Every action.
    pub const ALL: [AppointmentAction; 8] = [
        Self::StartReview,
        Self::Assign,
        Self::Reject,
        Self::Reassign,
        Self::Confirm,
        Self::Reschedule,
        Self::Complete,
        Self::Cancel,
    ];

    /// Status the appointment ends up in after this action.
    pub fn next_status(&self) -> AppointmentStatus {
        match self {
            Self::StartReview => AppointmentStatus::UnderReview,
            Self::Assign | Self::Reassign => AppointmentStatus::Assigned,
            Self::Reject => AppointmentStatus::Rejected,
            Self::Confirm => AppointmentStatus::Confirmed,
            Self::Reschedule => AppointmentStatus::Rescheduled,
            Self::Complete => AppointmentStatus::Completed,
            Self::Cancel => AppointmentStatus::Cancelled,
        }
    }

    /// The only role this action is ever offered to.
    pub fn performed_by(&self) -> UserRole {
        match self {
            Self::StartReview | Self::Assign | Self::Reject | Self::Reassign => {
                UserRole::ClinicalStaff
            }
            Self::Confirm | Self::Reschedule | Self::Complete | Self::Cancel => UserRole::Doctor,
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StartReview => "Start Review",
            Self::Assign => "Assign Doctor",
            Self::Reject => "Reject",
            Self::Reassign => "Reassign Doctor",
            Self::Confirm => "Confirm",
            Self::Reschedule => "Reschedule",
            Self::Complete => "Mark Completed",
            Self::Cancel => "Cancel",
        }
    }

    /// Button style.
    pub fn style(&self) -> ActionStyle {
        match self {
            Self::StartReview => ActionStyle::Primary,
            Self::Assign => ActionStyle::Success,
            Self::Reject | Self::Cancel => ActionStyle::Danger,
            Self::Reassign => ActionStyle::Secondary,
            Self::Confirm | Self::Complete => ActionStyle::Success,
            Self::Reschedule => ActionStyle::Warning,
        }
    }

    /// Whether the action needs a doctor to be chosen.
    pub fn requires_doctor(&self) -> bool {
        matches!(self, Self::Assign | Self::Reassign)
    }

    /// Whether the action needs a free-text reason.
    pub fn requires_reason(&self) -> bool {
        matches!(self, Self::Reject | Self::Cancel)
    }

    /// Whether the action needs a new date and time.
    pub fn requires_new_slot(&self) -> bool {
        matches!(self, Self::Reschedule)
    }

    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartReview => "start_review",
            Self::Assign => "assign",
            Self::Reject => "reject",
            Self::Reassign => "reassign",
            Self::Confirm => "confirm",
            Self::Reschedule => "reschedule",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    fn describe(self) -> AvailableAction {
        AvailableAction {
            action: self,
            label: self.label(),
            style: self.style(),
            next_status: self.next_status(),
        }
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s.to_lowercase())
            .ok_or_else(|| AppError::not_found(format!("Unknown appointment action: '{s}'")))
    }
}

/// One entry of the resolver's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableAction {
    /// Action identifier.
    pub action: AppointmentAction,
    /// Button label.
    pub label: &'static str,
    /// Button style.
    pub style: ActionStyle,
    /// Status after the action.
    pub next_status: AppointmentStatus,
}

fn catalogue(status: AppointmentStatus, role: UserRole) -> &'static [AppointmentAction] {
    use AppointmentAction::*;
    use AppointmentStatus as S;

    match (role, status) {
        (UserRole::ClinicalStaff, S::Pending) => &[StartReview],
        (UserRole::ClinicalStaff, S::UnderReview) => &[Assign, Reject],
        (UserRole::ClinicalStaff, S::Assigned) => &[Reassign],
        (UserRole::Doctor, S::Assigned) => &[Confirm, Reschedule],
        (UserRole::Doctor, S::Confirmed) => &[Complete, Cancel],
        _ => &[],
    }
}

/// Ordered actions a user with `role` may take on an appointment in `status`.
///
/// Patients and administrators never receive actions.
pub fn available_actions(status: AppointmentStatus, role: UserRole) -> Vec<AvailableAction> {
    catalogue(status, role)
        .iter()
        .map(|action| action.describe())
        .collect()
}

/// Actions the server accepts for a rescheduled appointment.
///
/// The table allows `rescheduled → confirmed | cancelled`; the assigned
/// doctor settles the new slot with these. They are not advertised by
/// [`available_actions`].
pub fn follow_up_actions(status: AppointmentStatus, role: UserRole) -> &'static [AppointmentAction] {
    match (role, status) {
        (UserRole::Doctor, AppointmentStatus::Rescheduled) => {
            &[AppointmentAction::Confirm, AppointmentAction::Cancel]
        }
        _ => &[],
    }
}

/// Decide whether `role` may perform `action` on an appointment in `status`.
///
/// Returns the resulting status. A role that is never offered the action
/// gets `ROLE_MISMATCH`; the right role at the wrong stage gets
/// `INVALID_STATUS_TRANSITION`.
pub fn authorize_action(
    status: AppointmentStatus,
    role: UserRole,
    action: AppointmentAction,
) -> Result<AppointmentStatus, AppError> {
    let offered = catalogue(status, role).contains(&action)
        || follow_up_actions(status, role).contains(&action);

    if offered {
        let next = action.next_status();
        if next != status {
            status.ensure_transition(next)?;
        }
        return Ok(next);
    }

    if action.performed_by() != role {
        return Err(AppError::forbidden(
            codes::ROLE_MISMATCH,
            format!(
                "Action '{action}' can only be performed by {}",
                action.performed_by()
            ),
        ));
    }

    Err(AppError::validation(format!(
        "Action '{action}' is not available for an appointment that is '{status}'"
    ))
    .with_code(codes::INVALID_STATUS_TRANSITION))
}

/// Catalogue entry used by the workflow endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActionCatalogueEntry {
    /// Role the actions are offered to.
    pub role: UserRole,
    /// Status the actions apply to.
    pub status: AppointmentStatus,
    /// Offered actions.
    pub actions: Vec<AvailableAction>,
}

/// Every non-empty (role, status) combination.
pub fn action_catalogue() -> Vec<ActionCatalogueEntry> {
    UserRole::ALL
        .into_iter()
        .flat_map(|role| {
            AppointmentStatus::ALL
                .into_iter()
                .map(move |status| (role, status))
        })
        .filter_map(|(role, status)| {
            let actions = available_actions(status, role);
            (!actions.is_empty()).then_some(ActionCatalogueEntry {
                role,
                status,
                actions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus as S;

    #[test]
    fn test_pending_clinical_staff_single_action() {
        let actions = available_actions(S::Pending, UserRole::ClinicalStaff);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, AppointmentAction::StartReview);
        assert_eq!(actions[0].next_status, S::UnderReview);
    }

    #[test]
    fn test_assigned_doctor_two_actions() {
        let actions = available_actions(S::Assigned, UserRole::Doctor);
        let next: Vec<_> = actions.iter().map(|a| a.next_status).collect();
        assert_eq!(next, vec![S::Confirmed, S::Rescheduled]);
    }

    #[test]
    fn test_patients_and_admins_get_nothing() {
        for role in [
            UserRole::Student,
            UserRole::AcademicStaff,
            UserRole::Admin,
            UserRole::Superadmin,
        ] {
            for status in S::ALL {
                assert!(available_actions(status, role).is_empty(), "{role} / {status}");
            }
        }
    }

    #[test]
    fn test_reassign_is_a_self_loop() {
        let actions = available_actions(S::Assigned, UserRole::ClinicalStaff);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, AppointmentAction::Reassign);
        assert_eq!(actions[0].next_status, S::Assigned);
        assert_eq!(
            authorize_action(S::Assigned, UserRole::ClinicalStaff, AppointmentAction::Reassign)
                .unwrap(),
            S::Assigned
        );
    }

    #[test]
    fn test_every_offered_action_respects_the_table() {
        for entry in action_catalogue() {
            for action in entry.actions {
                let next = action.next_status;
                assert!(
                    next == entry.status || entry.status.can_transition_to(next),
                    "{} offers {} from {}",
                    entry.role,
                    action.action,
                    entry.status
                );
            }
        }
    }

    #[test]
    fn test_authorize_role_mismatch() {
        let err = authorize_action(S::Pending, UserRole::Doctor, AppointmentAction::StartReview)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::ROLE_MISMATCH);

        let err = authorize_action(S::Assigned, UserRole::Student, AppointmentAction::Confirm)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::ROLE_MISMATCH);
    }

    #[test]
    fn test_only_clinical_staff_reject() {
        for role in UserRole::ALL {
            for status in S::ALL {
                let offers_reject = available_actions(status, role)
                    .iter()
                    .any(|a| a.action == AppointmentAction::Reject);
                assert_eq!(
                    offers_reject,
                    role == UserRole::ClinicalStaff && status == S::UnderReview,
                    "{role} / {status}"
                );
            }
        }

        let err = authorize_action(S::UnderReview, UserRole::Doctor, AppointmentAction::Reject)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::ROLE_MISMATCH);
    }

    #[test]
    fn test_authorize_wrong_stage() {
        let err = authorize_action(S::Pending, UserRole::Doctor, AppointmentAction::Confirm)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_STATUS_TRANSITION);

        let err = authorize_action(S::Completed, UserRole::Doctor, AppointmentAction::Cancel)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_STATUS_TRANSITION);
    }

    #[test]
    fn test_rescheduled_follow_up() {
        assert!(available_actions(S::Rescheduled, UserRole::Doctor).is_empty());
        assert_eq!(
            authorize_action(S::Rescheduled, UserRole::Doctor, AppointmentAction::Confirm).unwrap(),
            S::Confirmed
        );
        assert!(
            authorize_action(S::Rescheduled, UserRole::Doctor, AppointmentAction::Complete)
                .is_err()
        );
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(
            "start_review".parse::<AppointmentAction>().unwrap(),
            AppointmentAction::StartReview
        );
        assert!("approve".parse::<AppointmentAction>().is_err());
    }
}
