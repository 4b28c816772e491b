//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheMetrics, CacheStats, Clock, EntryMetadata, LruTracker, SystemClock,
};
use crate::config::CacheConfig;

// == Cache Store ==
/// Single-owner cache with LRU eviction and lazy TTL expiry.
///
/// Every key in `entries` is tracked exactly once by `lru` and vice versa.
/// Wrap it in [`Cache`](crate::cache::Cache) to share it between tasks.
#[derive(Debug)]
pub struct CacheStore<V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    config: CacheConfig,
    clock: C,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new store backed by the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C: Clock> CacheStore<V, C> {
    /// Creates a new store reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            config,
            clock,
        }
    }

    // == Set ==
    /// Stores a value under `key` with the default TTL.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.config.default_ttl();
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores a value under `key` with its own TTL.
    ///
    /// An existing key is fully replaced and becomes most recently used; this
    /// never evicts. A new key evicts the least recently used entry first when
    /// the store is full.
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size() {
            self.evict_one();
        }

        let entry = CacheEntry::new(value, ttl, self.clock.now());
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
    }

    // == Get ==
    /// Returns the value stored under `key` if it is live.
    ///
    /// A live entry counts as a hit and becomes most recently used. A missing
    /// or expired entry counts as a miss; the expired one is removed.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.lookup(key, true)
    }

    /// Reads `key` like [`get`](Self::get); hit/miss counters are only
    /// updated when `record` is true.
    pub(crate) fn lookup(&mut self, key: &str, record: bool) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now();

        // None = missing, Some(None) = expired, Some(Some(v)) = live
        let found = self.entries.get_mut(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                entry.record_access(now);
                Some(entry.value.clone())
            }
        });

        match found {
            Some(Some(value)) => {
                self.lru.touch(key);
                if record {
                    self.record_hit();
                }
                Some(value)
            }
            Some(None) => {
                debug!(key, "expired entry discovered on read");
                self.remove_entry(key);
                if record {
                    self.record_miss();
                }
                None
            }
            None => {
                if record {
                    self.record_miss();
                }
                None
            }
        }
    }

    // == Has ==
    /// Reports whether `key` holds a live entry.
    ///
    /// Leaves recency, access counts, and metrics untouched. An expired entry
    /// is reported absent but stays in place until a read or sweep finds it.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes every entry and, when metrics are enabled, zeroes the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        if self.config.metrics_enabled() {
            self.stats.reset();
        }
    }

    // == Invalidate Prefix ==
    /// Removes every key starting with `prefix`. Returns the number removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }

        debug!(prefix, removed = matching.len(), "invalidated keys by prefix");
        matching.len()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Live entries keep their value, TTL, access count, and recency position.
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        expired_keys.len()
    }

    // == Metrics ==
    /// Returns current counters and entry count.
    pub fn metrics(&self) -> CacheMetrics {
        self.stats.snapshot(self.entries.len())
    }

    // == Peek Metadata ==
    /// Returns an entry's bookkeeping without reading or refreshing it.
    pub fn peek_metadata(&self, key: &str) -> Option<EntryMetadata> {
        let now = self.clock.now();
        self.entries.get(key).map(|entry| entry.metadata(now))
    }

    // == Keys ==
    /// Returns stored keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().map(str::to_string).collect()
    }

    // == Length ==
    /// Returns the current number of entries, expired or not.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Drops the least recently used entry to make room.
    ///
    /// Only a live entry counts as an eviction; an expired one is just
    /// discarded.
    fn evict_one(&mut self) {
        let Some(evicted) = self.lru.evict_oldest() else {
            return;
        };
        let now = self.clock.now();
        match self.entries.remove(&evicted) {
            Some(entry) if !entry.is_expired(now) => {
                if self.config.metrics_enabled() {
                    self.stats.record_eviction();
                }
                debug!(key = %evicted, "evicted least recently used entry");
            }
            _ => debug!(key = %evicted, "dropped expired entry to make room"),
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
        }
        removed
    }

    fn record_hit(&mut self) {
        if self.config.metrics_enabled() {
            self.stats.record_hit();
        }
    }

    fn record_miss(&mut self) {
        if self.config.metrics_enabled() {
            self.stats.record_miss();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.entries.len() == self.lru.len()
            && self.entries.keys().all(|key| self.lru.contains(key))
    }
}
