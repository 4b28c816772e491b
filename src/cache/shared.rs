//! Shared Cache Module
//!
//! Thread-safe handle around a [`CacheStore`] with single-flight `get_or_set`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::cache::{CacheMetrics, CacheStore, Clock, EntryMetadata, SystemClock};
use crate::config::CacheConfig;

// == Cache ==
/// Cloneable, thread-safe cache handle.
///
/// One mutex guards the whole store (table, recency order and counters), so
/// every operation observes and leaves a consistent state. Clones share the
/// same store. The lock is never held across an `.await`.
///
/// Values are handed out by clone; store `Arc<T>` to share large payloads.
#[derive(Debug)]
pub struct Cache<V, C = SystemClock> {
    inner: Arc<Inner<V, C>>,
}

#[derive(Debug)]
struct Inner<V, C> {
    store: Mutex<CacheStore<V, C>>,
    /// Per-key locks of `get_or_set` calls currently populating a key
    inflight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<V, C> Clone for Cache<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V> {
    // == Constructor ==
    /// Creates a cache backed by the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::from_store(CacheStore::new(config))
    }
}

impl<V, C: Clock> Cache<V, C> {
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self::from_store(CacheStore::with_clock(config, clock))
    }

    fn from_store(store: CacheStore<V, C>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn store(&self) -> MutexGuard<'_, CacheStore<V, C>> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store().set(key, value);
    }

    /// See [`CacheStore::set_with_ttl`].
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store().set_with_ttl(key, value, ttl);
    }

    /// See [`CacheStore::delete`].
    pub fn delete(&self, key: &str) -> bool {
        self.store().delete(key)
    }

    /// See [`CacheStore::has`].
    pub fn has(&self, key: &str) -> bool {
        self.store().has(key)
    }

    /// See [`CacheStore::clear`].
    pub fn clear(&self) {
        self.store().clear();
    }

    /// See [`CacheStore::invalidate_prefix`].
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.store().invalidate_prefix(prefix)
    }

    /// See [`CacheStore::cleanup`].
    pub fn cleanup(&self) -> usize {
        self.store().cleanup()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.store().metrics()
    }

    pub fn size(&self) -> usize {
        self.store().size()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    pub fn peek_metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.store().peek_metadata(key)
    }

    /// Stored keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.store().keys()
    }

    pub fn config(&self) -> CacheConfig {
        *self.store().config()
    }
}

impl<V: Clone, C: Clock> Cache<V, C> {
    /// See [`CacheStore::get`].
    pub fn get(&self, key: &str) -> Option<V> {
        self.store().get(key)
    }

    // == Get Or Set ==
    /// Returns the live value under `key`, or computes, stores and returns it.
    ///
    /// The entry gets the default TTL. See
    /// [`get_or_set_with_ttl`](Self::get_or_set_with_ttl) for the concurrency
    /// and error contract.
    pub async fn get_or_set<F, Fut, E>(&self, key: impl Into<String>, factory: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.populate(key.into(), None, factory).await
    }

    /// Returns the live value under `key`, or computes, stores and returns it
    /// with the given TTL.
    ///
    /// Concurrent calls for the same missing key are single-flight: one caller
    /// runs its factory while the others wait and then read the stored value.
    /// Each call counts exactly one hit or miss, on its first lookup.
    ///
    /// A factory error is returned unchanged and nothing is stored. The same
    /// holds when the returned future is dropped before the factory finishes.
    /// In both cases the next waiter, if any, runs its own factory.
    pub async fn get_or_set_with_ttl<F, Fut, E>(
        &self,
        key: impl Into<String>,
        ttl: Duration,
        factory: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.populate(key.into(), Some(ttl), factory).await
    }

    async fn populate<F, Fut, E>(
        &self,
        key: String,
        ttl: Option<Duration>,
        factory: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let slot = InflightSlot::acquire(&self.inner.inflight, &key);
        let _permit = slot.lock.lock().await;

        // Another caller may have populated the key while we waited
        let ready = self.store().lookup(&key, false);
        if let Some(value) = ready {
            return Ok(value);
        }

        debug!(key = %key, "populating cache entry from factory");
        let value = factory().await?;

        let mut store = self.store();
        match ttl {
            Some(ttl) => store.set_with_ttl(key, value.clone(), ttl),
            None => store.set(key, value.clone()),
        }
        Ok(value)
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inner
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// == Inflight Slot ==
/// Registration of one `get_or_set` call in the per-key lock table.
///
/// The last registration for a key removes the table entry on drop.
struct InflightSlot<'a> {
    table: &'a Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    key: String,
    lock: Arc<AsyncMutex<()>>,
}

impl<'a> InflightSlot<'a> {
    fn acquire(table: &'a Mutex<HashMap<String, Arc<AsyncMutex<()>>>>, key: &str) -> Self {
        let lock = {
            let mut map = table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        Self {
            table,
            key: key.to_string(),
            lock,
        }
    }
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        let mut map = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference held by the table, one by us
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.key);
        }
    }
}
