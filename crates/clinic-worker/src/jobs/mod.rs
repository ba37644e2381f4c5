//! Built-in job handler implementations.

pub mod calendar;
pub mod cleanup;
pub mod delivery;

pub use calendar::CalendarSyncHandler;
pub use cleanup::NotificationCleanupHandler;
pub use delivery::{DeliveryChannels, NotificationDeliveryHandler};
