//! Cache Admin Module
//!
//! Value-agnostic maintenance interface, so caches holding different value
//! types can be swept and inspected together.

use crate::cache::{Cache, CacheMetrics, Clock};

// == Cache Admin ==
/// Maintenance operations that do not need to know the value type.
pub trait CacheAdmin: Send + Sync {
    fn metrics(&self) -> CacheMetrics;

    /// Removes expired entries, returning how many were removed.
    fn cleanup(&self) -> usize;

    /// Removes keys starting with `prefix`, returning how many were removed.
    fn invalidate_prefix(&self, prefix: &str) -> usize;

    fn clear(&self);

    fn size(&self) -> usize;
}

impl<V, C> CacheAdmin for Cache<V, C>
where
    V: Send + 'static,
    C: Clock,
{
    fn metrics(&self) -> CacheMetrics {
        Cache::metrics(self)
    }

    fn cleanup(&self) -> usize {
        Cache::cleanup(self)
    }

    fn invalidate_prefix(&self, prefix: &str) -> usize {
        Cache::invalidate_prefix(self, prefix)
    }

    fn clear(&self) {
        Cache::clear(self)
    }

    fn size(&self) -> usize {
        Cache::size(self)
    }
}
