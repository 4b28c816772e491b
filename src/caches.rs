//! Concern Caches
//!
//! One explicitly constructed cache per concern, owned by the host process
//! and handed to the services that need it. Nothing here is global.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{Cache, CacheAdmin, CacheMetrics};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Cached search result pages
pub type SearchResults = Arc<Value>;

/// Cached derived statistics (herd averages, breeding summaries)
pub type Statistics = Arc<Value>;

/// Cached decoded image bytes
pub type ImageBytes = Arc<[u8]>;

// == Herd Caches ==
/// The caches of the herdbook application, one per concern.
///
/// Keeping concerns apart means `clear` or `invalidate_prefix` on one never
/// touches another.
#[derive(Debug, Clone)]
pub struct HerdCaches {
    pub search: Cache<SearchResults>,
    pub statistics: Cache<Statistics>,
    pub images: Cache<ImageBytes>,
}

impl HerdCaches {
    /// Builds every concern cache from its configured size and TTL.
    pub fn from_config(config: &Config) -> Self {
        Self {
            search: Cache::new(config.search),
            statistics: Cache::new(config.statistics),
            images: Cache::new(config.images),
        }
    }

    /// Registers every concern cache under its name.
    pub fn registry(&self) -> CacheRegistry {
        let mut registry = CacheRegistry::new();
        registry.register("search", self.search.clone());
        registry.register("statistics", self.statistics.clone());
        registry.register("images", self.images.clone());
        registry
    }
}

// == Cache Registry ==
/// Named, type-erased caches for maintenance and inspection.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Vec<(String, Arc<dyn CacheAdmin>)>,
}

/// Metrics of one registered cache.
#[derive(Debug, Clone, Serialize)]
pub struct NamedMetrics {
    pub name: String,
    #[serde(flatten)]
    pub metrics: CacheMetrics,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `cache` under `name`, replacing any cache already registered there.
    pub fn register(&mut self, name: impl Into<String>, cache: impl CacheAdmin + 'static) {
        let name = name.into();
        let cache: Arc<dyn CacheAdmin> = Arc::new(cache);
        match self.caches.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = cache,
            None => self.caches.push((name, cache)),
        }
    }

    /// Looks up a cache by name.
    pub fn get(&self, name: &str) -> Result<&dyn CacheAdmin> {
        self.caches
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, cache)| cache.as_ref())
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))
    }

    /// Iterates registered caches in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn CacheAdmin)> + '_ {
        self.caches
            .iter()
            .map(|(name, cache)| (name.as_str(), cache.as_ref()))
    }

    /// Metrics of every registered cache, in registration order.
    pub fn metrics(&self) -> Vec<NamedMetrics> {
        self.iter()
            .map(|(name, cache)| NamedMetrics {
                name: name.to_string(),
                metrics: cache.metrics(),
            })
            .collect()
    }

    /// Runs `cleanup` on every cache. Returns the total number removed.
    pub fn cleanup_all(&self) -> usize {
        self.iter().map(|(_, cache)| cache.cleanup()).sum()
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.caches.iter().map(|(name, _)| name))
            .finish()
    }
}
