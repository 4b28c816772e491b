//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use serde::Serialize;

// == Cache Entry ==
/// Represents a single cache entry with value and bookkeeping metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation or last refresh time
    pub stored_at: Instant,
    /// Expiry window of this entry
    pub ttl: Duration,
    /// Number of successful reads, starting at 1 on insert
    pub access_count: u64,
    /// Time of the last successful read (or insert)
    pub last_accessed_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stored at `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            stored_at: now,
            ttl,
            access_count: 1,
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once strictly more than `ttl` has elapsed since it
    /// was stored; at exactly `ttl` it is still live.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    // == Record Access ==
    /// Bumps the access counter and last access time.
    pub fn record_access(&mut self, now: Instant) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.stored_at))
    }

    // == Metadata ==
    /// Returns a value-free snapshot of the entry's bookkeeping.
    pub fn metadata(&self, now: Instant) -> EntryMetadata {
        EntryMetadata {
            ttl: self.ttl,
            age: now.saturating_duration_since(self.stored_at),
            ttl_remaining: self.ttl_remaining(now),
            access_count: self.access_count,
            idle: now.saturating_duration_since(self.last_accessed_at),
            expired: self.is_expired(now),
        }
    }
}

// == Entry Metadata ==
/// Read-only view of an entry's bookkeeping, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryMetadata {
    /// Expiry window the entry was stored with
    pub ttl: Duration,
    /// Time since the entry was stored or refreshed
    pub age: Duration,
    /// Lifetime left before expiry
    pub ttl_remaining: Duration,
    /// Successful reads, including the initial store
    pub access_count: u64,
    /// Time since the last successful read
    pub idle: Duration,
    /// Whether the entry is past its TTL but not yet removed
    pub expired: bool,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value", Duration::from_secs(60), now);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.stored_at, now);
        assert_eq!(entry.last_accessed_at, now);
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value", Duration::from_millis(50), now);

        assert!(!entry.is_expired(now + Duration::from_millis(10)));
        assert!(entry.is_expired(now + Duration::from_millis(60)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("test", Duration::from_secs(1), now);

        // Exactly at the TTL the entry is still served
        assert!(!entry.is_expired(now + Duration::from_secs(1)));
        assert!(entry.is_expired(now + Duration::from_millis(1001)));
    }

    #[test]
    fn test_zero_ttl_expires_after_any_elapsed_time() {
        let now = Instant::now();
        let entry = CacheEntry::new("test", Duration::ZERO, now);

        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_record_access() {
        let now = Instant::now();
        let mut entry = CacheEntry::new(1u32, Duration::from_secs(10), now);

        let later = now + Duration::from_secs(2);
        entry.record_access(later);
        entry.record_access(later);

        assert_eq!(entry.access_count, 3);
        assert_eq!(entry.last_accessed_at, later);
        assert_eq!(entry.stored_at, now);
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new((), Duration::from_secs(10), now);

        assert_eq!(entry.ttl_remaining(now), Duration::from_secs(10));
        assert_eq!(
            entry.ttl_remaining(now + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(entry.ttl_remaining(now + Duration::from_secs(11)), Duration::ZERO);
    }

    #[test]
    fn test_metadata_snapshot() {
        let now = Instant::now();
        let mut entry = CacheEntry::new((), Duration::from_secs(10), now);
        entry.record_access(now + Duration::from_secs(3));

        let meta = entry.metadata(now + Duration::from_secs(5));
        assert_eq!(meta.ttl, Duration::from_secs(10));
        assert_eq!(meta.age, Duration::from_secs(5));
        assert_eq!(meta.ttl_remaining, Duration::from_secs(5));
        assert_eq!(meta.access_count, 2);
        assert_eq!(meta.idle, Duration::from_secs(2));
        assert!(!meta.expired);
    }
}
