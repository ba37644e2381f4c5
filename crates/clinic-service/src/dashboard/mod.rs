//! Role-specific dashboard counts.

pub mod service;

pub use service::{Dashboard, DashboardService};
