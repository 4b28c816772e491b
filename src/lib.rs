//! Herd Cache - in-process cache engine for the herdbook record keeper
//!
//! Bounded key/value caches with per-entry TTL expiry, LRU eviction and
//! hit/miss metrics, plus the admin surface a host process can expose.

pub mod api;
pub mod cache;
pub mod caches;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{create_key, Cache, CacheMetrics, CacheStore};
pub use caches::{CacheRegistry, HerdCaches};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use tasks::spawn_cleanup_task;
