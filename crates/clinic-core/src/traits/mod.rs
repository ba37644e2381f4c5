//! Core traits shared across crates.

pub mod cache;
pub mod events;

pub use cache::CacheProvider;
pub use events::{EventPublisher, NoopPublisher};
