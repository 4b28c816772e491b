//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod admin;
mod clock;
mod entry;
mod key;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use admin::CacheAdmin;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryMetadata};
pub use key::{create_key, KeyPart, KEY_SEPARATOR};
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::{CacheMetrics, CacheStats};
pub use store::CacheStore;
