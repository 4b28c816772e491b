//! Background Tasks Module
//!
//! Contains background tasks a host process may run alongside its caches.
//!
//! # Tasks
//! - Expiry sweep: calls `cleanup` on every registered cache at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
