//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! registered cache. Caches never sweep themselves; the host decides whether
//! to run this.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::caches::CacheRegistry;

/// Spawns a background task that periodically calls `cleanup` on every cache
/// in `registry`.
///
/// Each sweep takes every cache's lock in turn, the same lock that guards
/// regular operations. Between sweeps `size` and metrics may still count
/// entries that have expired but were not yet read.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let caches = HerdCaches::from_config(&config);
/// let cleanup_handle = spawn_cleanup_task(caches.registry(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(registry: CacheRegistry, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting expiry sweep over {} caches every {:?}",
            registry.len(),
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            for (name, cache) in registry.iter() {
                let removed = cache.cleanup();
                if removed > 0 {
                    info!(cache = name, removed, "expiry sweep removed entries");
                } else {
                    debug!(cache = name, "expiry sweep found nothing to remove");
                }
            }
        }
    })
}
