//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{HashMap, VecDeque};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Each touch appends a `(stamp, key)` pair and records the stamp as the
/// key's current position. Older pairs for the same key become stale and are
/// skipped lazily, which keeps touch/remove/evict O(1) amortized. The deque is
/// compacted once stale pairs outnumber live ones.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Access order, possibly containing stale pairs
    order: VecDeque<(u64, String)>,
    /// Current stamp of every tracked key
    stamps: HashMap<String, u64>,
    /// Next stamp to hand out
    next_stamp: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// Works for both new and already tracked keys.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        match self.stamps.get_mut(key) {
            Some(current) => *current = stamp,
            None => {
                self.stamps.insert(key.to_string(), stamp);
            }
        }
        self.order.push_back((stamp, key.to_string()));
        self.maybe_compact();
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.stamps.remove(key).is_some();
        if removed {
            self.maybe_compact();
        }
        removed
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        while let Some((stamp, key)) = self.order.pop_front() {
            if self.stamps.get(&key) == Some(&stamp) {
                self.stamps.remove(&key);
                return Some(key);
            }
        }
        None
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    fn peek_oldest(&self) -> Option<&str> {
        self.order
            .iter()
            .find(|(stamp, key)| self.stamps.get(key) == Some(stamp))
            .map(|(_, key)| key.as_str())
    }

    // == Iterate ==
    /// Iterates tracked keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter(|(stamp, key)| self.stamps.get(key) == Some(stamp))
            .map(|(_, key)| key.as_str())
    }

    // == Clear ==
    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }

    /// Drops stale pairs once they make up more than half of the deque.
    fn maybe_compact(&mut self) {
        if self.order.len() <= 2 * self.stamps.len() + 16 {
            return;
        }
        let stamps = &self.stamps;
        self.order
            .retain(|(stamp, key)| stamps.get(key) == Some(stamp));
    }
}
