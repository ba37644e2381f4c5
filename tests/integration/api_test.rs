//! Integration tests for the HTTP surface: auth, roles, validation, workflow.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use clinic_cache::keys;
use clinic_core::traits::cache::CacheProvider;

use clinic_entity::user::{UserRole, UserStatus};
use clinic_service::SyncReport;

const SOME_ID: &str = "00000000-0000-0000-0000-000000000042";

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/appointments", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("UNAUTHENTICATED"));
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/notifications", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("INVALID_TOKEN"));
}

#[tokio::test]
async fn test_deactivated_account_token_is_rejected() {
    let app = helpers::TestApp::new();
    let token = app
        .token_with_status(UserRole::Student, UserStatus::Inactive)
        .await;

    let response = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("ACCOUNT_INACTIVE"));
}

#[tokio::test]
async fn test_student_cannot_reach_admin_routes() {
    let app = helpers::TestApp::new();
    let token = app.token_for(UserRole::Student).await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("INSUFFICIENT_PERMISSIONS"));
}

#[tokio::test]
async fn test_patient_roles_cannot_take_workflow_actions() {
    let app = helpers::TestApp::new();

    for role in [UserRole::Student, UserRole::AcademicStaff, UserRole::Admin] {
        let token = app.token_for(role).await;
        let response = app
            .request(
                "POST",
                &format!("/api/appointments/{SOME_ID}/actions/confirm"),
                None,
                Some(&token),
            )
            .await;

        assert_eq!(response.status, StatusCode::FORBIDDEN, "role {role}");
        assert_eq!(response.error_code(), Some("ROLE_MISMATCH"), "role {role}");
    }
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let app = helpers::TestApp::new();
    let token = app.token_for(UserRole::Doctor).await;

    let response = app
        .request(
            "POST",
            &format!("/api/appointments/{SOME_ID}/actions/teleport"),
            Some(json!({})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_reports_field_errors() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "not-an-email",
                "password": "x",
                "full_name": "A",
                "role": "student",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), Some("VALIDATION_FAILED"));
    let errors = &response.body["errors"];
    assert!(errors.get("email").is_some(), "errors: {errors}");
    assert!(errors.get("full_name").is_some(), "errors: {errors}");
}

#[tokio::test]
async fn test_workflow_is_public() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/appointments/workflow", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let transitions = response.body["data"]["transitions"]
        .as_array()
        .expect("transitions array");
    assert_eq!(transitions.len(), 8);
    assert!(
        response.body["data"]["actions"]
            .as_array()
            .is_some_and(|a| !a.is_empty())
    );
}

#[tokio::test]
async fn test_transition_check() {
    let app = helpers::TestApp::new();

    let allowed = app
        .request(
            "GET",
            "/api/appointments/transitions/check?from=pending&to=under_review",
            None,
            None,
        )
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["data"]["allowed"], true);

    let skipped = app
        .request(
            "GET",
            "/api/appointments/transitions/check?from=pending&to=completed",
            None,
            None,
        )
        .await;
    assert_eq!(skipped.body["data"]["allowed"], false);

    let unknown = app
        .request(
            "GET",
            "/api/appointments/transitions/check?from=archived&to=pending",
            None,
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_doctor_cannot_sync_calendar() {
    let app = helpers::TestApp::new();
    let token = app.token_for(UserRole::Doctor).await;

    let response = app
        .request("POST", "/api/admin/calendar/sync", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_calendar_report_comes_from_cache() {
    let app = helpers::TestApp::new();
    let token = app.token_for(UserRole::Admin).await;

    let report = SyncReport {
        year: 2031,
        academic_year: "2031-2032".to_string(),
        synced: 9,
        sources_checked: 3,
        ..Default::default()
    };
    app.state
        .cache
        .put_json(
            &keys::calendar_sync_report(2031),
            &report,
            Duration::from_secs(60),
        )
        .await
        .expect("cache report");

    let found = app
        .request("GET", "/api/admin/calendar/sync/2031", None, Some(&token))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["academic_year"], "2031-2032");
    assert_eq!(found.body["data"]["synced"], 9);
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["database"], "unavailable");
    assert_eq!(response.body["data"]["status"], "degraded");
}
