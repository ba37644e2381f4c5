//! Route definitions for the clinic HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(appointment_routes())
        .merge(notification_routes())
        .merge(holiday_routes())
        .merge(medical_record_routes())
        .merge(admin_routes())
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/health", get(handlers::health::health));

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Register, login, refresh, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Booking, lookup, workflow rules, and status actions
fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            get(handlers::appointment::list_appointments)
                .post(handlers::appointment::create_appointment),
        )
        .route("/appointments/workflow", get(handlers::appointment::workflow))
        .route(
            "/appointments/transitions/check",
            get(handlers::appointment::check_transition),
        )
        .route("/appointments/{id}", get(handlers::appointment::get_appointment))
        .route(
            "/appointments/{id}/actions",
            get(handlers::appointment::list_actions),
        )
        .route(
            "/appointments/{id}/actions/{action}",
            post(handlers::appointment::perform_action),
        )
        .route(
            "/appointments/{id}/medical-record",
            post(handlers::medical_record::create),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

fn holiday_routes() -> Router<AppState> {
    Router::new()
        .route("/holidays", get(handlers::holiday::list_holidays))
        .route("/holidays/check", get(handlers::holiday::check_date))
}

fn medical_record_routes() -> Router<AppState> {
    Router::new()
        .route("/medical-records", get(handlers::medical_record::list_own))
        .route(
            "/patients/{id}/medical-records",
            get(handlers::medical_record::list_for_patient),
        )
}

/// Admin-only endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/users",
            get(handlers::admin::users::list_users).post(handlers::admin::users::create_user),
        )
        .route(
            "/admin/users/{id}/status",
            put(handlers::admin::users::change_status),
        )
        .route(
            "/admin/users/{id}/verify",
            put(handlers::admin::users::verify_user),
        )
        .route("/admin/settings", get(handlers::admin::settings::list_settings))
        .route(
            "/admin/settings/{key}",
            put(handlers::admin::settings::update_setting),
        )
        .route(
            "/admin/calendar/sync",
            post(handlers::admin::calendar::sync_now),
        )
        .route(
            "/admin/calendar/sync/{year}",
            get(handlers::admin::calendar::last_report),
        )
}
