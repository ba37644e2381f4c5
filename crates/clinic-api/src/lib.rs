//! # clinic-api
//!
//! HTTP API layer for the campus clinic built on Axum.
//!
//! Provides the REST endpoints, the WebSocket upgrade, middleware (RBAC,
//! CORS, request logging), extractors, DTOs, and server wiring.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
