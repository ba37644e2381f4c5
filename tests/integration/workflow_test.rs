//! Walks appointments through the workflow the way the clinic does, checking
//! that the status table, the action resolver, and the patient messages agree.

use clinic_core::error::codes;
use clinic_entity::appointment::{
    AppointmentAction as A, AppointmentStatus as S, MessageData, MessageType, authorize_action,
    available_actions, can_transition_to, notification_message,
};
use clinic_entity::user::UserRole;

/// Apply `action` as `role`, asserting that the resolver offered or accepted it.
fn step(status: S, role: UserRole, action: A) -> S {
    authorize_action(status, role, action)
        .unwrap_or_else(|e| panic!("{role} could not {action} from {status}: {e}"))
}

fn slot() -> MessageData {
    MessageData {
        doctor_name: Some("Mehmet Kaya".into()),
        date: Some("2025-11-12".into()),
        time: Some("09:15".into()),
        ..Default::default()
    }
}

#[test]
fn test_visit_from_request_to_completion() {
    let mut status = S::Pending;
    let path = [
        (UserRole::ClinicalStaff, A::StartReview, S::UnderReview, "Appointment Under Review"),
        (UserRole::ClinicalStaff, A::Assign, S::Assigned, "Doctor Assigned"),
        (UserRole::Doctor, A::Confirm, S::Confirmed, "Appointment Confirmed"),
        (UserRole::Doctor, A::Complete, S::Completed, "Appointment Completed"),
    ];

    for (role, action, expected, title) in path {
        assert!(
            available_actions(status, role).iter().any(|a| a.action == action),
            "{action} should be offered to {role} at {status}"
        );
        status = step(status, role, action);
        assert_eq!(status, expected);
        assert_eq!(notification_message(status, &slot()).title, title);
    }

    assert!(status.is_terminal());
    for role in UserRole::ALL {
        assert!(available_actions(status, role).is_empty());
    }
}

#[test]
fn test_rescheduled_visit_is_settled_by_the_doctor() {
    let status = step(S::Assigned, UserRole::Doctor, A::Reschedule);
    assert_eq!(status, S::Rescheduled);

    let msg = notification_message(
        status,
        &MessageData {
            new_date: Some("2025-11-14".into()),
            new_time: Some("13:30".into()),
            ..slot()
        },
    );
    assert_eq!(msg.kind, MessageType::Warning);
    assert!(msg.message.contains("2025-11-14 at 13:30"));

    // Nothing is advertised, but the doctor can still settle the new slot.
    assert!(available_actions(status, UserRole::Doctor).is_empty());
    assert_eq!(step(status, UserRole::Doctor, A::Confirm), S::Confirmed);
    assert_eq!(step(status, UserRole::Doctor, A::Cancel), S::Cancelled);

    let err = authorize_action(status, UserRole::ClinicalStaff, A::Confirm).unwrap_err();
    assert_eq!(err.error_code(), codes::ROLE_MISMATCH);
}

#[test]
fn test_reassign_keeps_the_appointment_assigned() {
    assert_eq!(
        step(S::Assigned, UserRole::ClinicalStaff, A::Reassign),
        S::Assigned
    );
}

#[test]
fn test_rejection_carries_the_reason_to_the_patient() {
    let status = step(S::UnderReview, UserRole::ClinicalStaff, A::Reject);
    assert_eq!(status, S::Rejected);

    let msg = notification_message(
        status,
        &MessageData {
            rejection_reason: Some("Please book with the dental unit".into()),
            ..slot()
        },
    );
    assert_eq!(msg.kind, MessageType::Error);
    assert!(msg.message.contains("Please book with the dental unit"));
}

#[test]
fn test_every_offered_action_is_a_legal_move() {
    for role in UserRole::ALL {
        for status in S::ALL {
            for offered in available_actions(status, role) {
                let next = offered.action.next_status();
                assert!(
                    next == status || can_transition_to(status, next),
                    "{role} offered {} from {status} to {next}",
                    offered.action
                );
            }
        }
    }
}

#[test]
fn test_wrong_stage_and_wrong_role_are_distinguished() {
    let early = authorize_action(S::Pending, UserRole::Doctor, A::Complete).unwrap_err();
    assert_eq!(early.error_code(), codes::INVALID_STATUS_TRANSITION);

    for role in [UserRole::Student, UserRole::AcademicStaff, UserRole::Admin] {
        let err = authorize_action(S::Pending, role, A::StartReview).unwrap_err();
        assert_eq!(err.error_code(), codes::ROLE_MISMATCH, "role {role}");
    }
}
