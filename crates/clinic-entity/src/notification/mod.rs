//! Notification domain entities.

pub mod category;
pub mod method;
pub mod model;
pub mod status;

pub use category::NotificationCategory;
pub use method::DeliveryMethod;
pub use model::{CreateNotification, Notification};
pub use status::NotificationStatus;
