//! # clinic-cache
//!
//! In-process cache built on [moka](https://crates.io/crates/moka) with
//! per-entry TTLs, a [`CacheManager`] handle shared through application
//! state, and the [`SettingsCache`] used in front of the settings table.

pub mod keys;
pub mod memory;
pub mod provider;
pub mod settings;

pub use memory::MemoryCacheProvider;
pub use provider::CacheManager;
pub use settings::SettingsCache;
