//! Configuration Module
//!
//! Per-cache settings plus the host process configuration loaded from
//! environment variables.

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum number of entries per cache
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Default TTL for entries stored without an explicit one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

// == Cache Config ==
/// Immutable settings of one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    max_size: NonZeroUsize,
    default_ttl: Duration,
    metrics_enabled: bool,
}

impl CacheConfig {
    /// Creates a config with metrics enabled.
    ///
    /// Fails with [`CacheError::InvalidConfig`] when `max_size` is zero.
    pub fn new(max_size: usize, default_ttl: Duration) -> Result<Self> {
        let max_size = NonZeroUsize::new(max_size).ok_or_else(|| {
            CacheError::InvalidConfig("max_size must be greater than zero".to_string())
        })?;

        Ok(Self {
            max_size,
            default_ttl,
            metrics_enabled: true,
        })
    }

    /// Turns hit/miss/eviction counting on or off.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Upper bound on stored entries before LRU eviction kicks in
    pub fn max_size(&self) -> usize {
        self.max_size.get()
    }

    /// TTL applied when `set` is called without one
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: NonZeroUsize::new(DEFAULT_MAX_SIZE).unwrap_or(NonZeroUsize::MIN),
            default_ttl: DEFAULT_TTL,
            metrics_enabled: true,
        }
    }
}

// == Host Config ==
/// Host process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin HTTP server port
    pub server_port: u16,
    /// Interval in seconds between maintenance sweeps
    pub cleanup_interval: u64,
    /// Search results cache
    pub search: CacheConfig,
    /// Derived statistics cache
    pub statistics: CacheConfig,
    /// Decoded images cache
    pub images: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SEARCH_CACHE_MAX_SIZE` / `SEARCH_CACHE_TTL` (default: 50 / 120s)
    /// - `STATS_CACHE_MAX_SIZE` / `STATS_CACHE_TTL` (default: 20 / 600s)
    /// - `IMAGE_CACHE_MAX_SIZE` / `IMAGE_CACHE_TTL` (default: 100 / 1800s)
    /// - `CACHE_METRICS` - Track hits/misses/evictions (default: true)
    ///
    /// Fails if a cache size is set to zero.
    pub fn from_env() -> Result<Self> {
        let metrics = env_or("CACHE_METRICS", true);

        Ok(Self {
            server_port: env_or("SERVER_PORT", 3000),
            cleanup_interval: env_or("CLEANUP_INTERVAL", 60),
            search: cache_from_env("SEARCH_CACHE", 50, 120)?.with_metrics(metrics),
            statistics: cache_from_env("STATS_CACHE", 20, 600)?.with_metrics(metrics),
            images: cache_from_env("IMAGE_CACHE", 100, 1800)?.with_metrics(metrics),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 60,
            search: cache_defaults(50, 120),
            statistics: cache_defaults(20, 600),
            images: cache_defaults(100, 1800),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn cache_from_env(prefix: &str, max_size: usize, ttl_secs: u64) -> Result<CacheConfig> {
    CacheConfig::new(
        env_or(&format!("{}_MAX_SIZE", prefix), max_size),
        Duration::from_secs(env_or(&format!("{}_TTL", prefix), ttl_secs)),
    )
}

fn cache_defaults(max_size: usize, ttl_secs: u64) -> CacheConfig {
    CacheConfig::new(max_size, Duration::from_secs(ttl_secs)).unwrap_or_default()
}
