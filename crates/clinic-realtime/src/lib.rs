//! # clinic-realtime
//!
//! In-process realtime layer for the clinic backend:
//!
//! - Typed channels (`user:{id}`, `role:{role}`)
//! - In-memory broadcast pub/sub
//! - Domain event bridge implementing [`clinic_core::traits::EventPublisher`]
//! - JWT authentication and per-connection subscriptions for WebSockets

pub mod authenticator;
pub mod bridge;
pub mod channel;
pub mod hub;
pub mod message;
pub mod pubsub;

pub use authenticator::{AuthenticatedConnection, authenticate_socket};
pub use bridge::EventBridge;
pub use channel::ChannelType;
pub use hub::{RealtimeHub, Subscription};
pub use message::{InboundMessage, OutboundMessage};
pub use pubsub::MemoryPubSub;
