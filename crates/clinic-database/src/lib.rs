//! # clinic-database
//!
//! PostgreSQL connection management, migrations, and concrete repository
//! implementations for all clinic entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::{connect, connect_lazy};
