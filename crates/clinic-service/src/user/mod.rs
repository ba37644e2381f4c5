//! Account registration, authentication, and administration.

pub mod admin;
pub mod guard;
pub mod service;

pub use admin::{AdminUserService, CreateStaffRequest};
pub use guard::{AccountGuard, AccountStatuses};
pub use service::{AuthService, LoginResponse, RegisterRequest};
