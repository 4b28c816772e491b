//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Running hit/miss/eviction counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found a live entry
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of live entries removed to make room
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Ratio ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Reset ==
    /// Sets every counter back to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // == Snapshot ==
    /// Combines the counters with the current entry count.
    pub fn snapshot(&self, size: usize) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size,
            hit_ratio: self.hit_ratio(),
        }
    }
}

// == Cache Metrics ==
/// Point-in-time metrics of one cache.
///
/// `size` counts every stored entry, including expired ones that no lookup
/// or sweep has discovered yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub hit_ratio: f64,
}
