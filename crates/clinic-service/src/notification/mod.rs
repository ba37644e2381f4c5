//! User notifications: inbox operations and dispatch.

pub mod dispatch;
pub mod service;

pub use dispatch::{NotificationDispatcher, OutgoingNotification};
pub use service::NotificationService;
