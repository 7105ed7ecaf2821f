//! LRU Cache Module
//!
//! Bounded key-value cache combining HashMap storage with a recency index.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyIndex};

// == Invariant Violation ==
/// A broken structural invariant of the cache. Never expected outside of a
/// programming fault.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("cache holds {len} entries, capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    #[error("value map holds {entries} keys but recency index holds {indexed}")]
    IndexMismatch { entries: usize, indexed: usize },
}

// == LRU Cache ==
/// Fixed-capacity cache from integer key to string value, ordered by
/// recency of access.
///
/// The cache is not synchronized; shared use goes through a single lock
/// (see [`KvService`](crate::service::KvService)).
#[derive(Debug)]
pub struct LruCache {
    /// Key-value storage
    entries: HashMap<i64, String>,
    /// Access order
    recency: RecencyIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries retained after any operation
    capacity: usize,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyIndex::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Get ==
    /// Returns the cached value for `key`, promoting it to most recently used.
    ///
    /// A miss leaves the order untouched.
    pub fn get(&mut self, key: i64) -> Option<String> {
        match self.entries.get(&key) {
            Some(value) => {
                let value = value.clone();
                self.recency.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the cached value without promoting it or counting a read.
    pub fn peek(&self, key: i64) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    // == Put ==
    /// Inserts a new entry as most recently used, evicting the least
    /// recently used entry if the cache overflows.
    ///
    /// Callers must check membership first. Returns the evicted entry, if any.
    pub fn put(&mut self, key: i64, value: String) -> Option<CacheEntry> {
        debug_assert!(
            !self.entries.contains_key(&key),
            "put on already cached key {key}"
        );

        self.entries.insert(key, value);
        self.recency.touch(key);

        let evicted = self.evict_if_over(self.capacity);
        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Update If Present ==
    /// Overwrites the value of a cached key and promotes it.
    ///
    /// Never inserts. Returns whether the key was cached.
    pub fn update_if_present(&mut self, key: i64, value: String) -> bool {
        match self.entries.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                self.recency.touch(key);
                true
            }
            None => false,
        }
    }

    // == Evict If Over ==
    /// Removes least recently used entries until at most `capacity` remain.
    ///
    /// Returns the last entry evicted. With single-entry insertions at most
    /// one eviction happens per call.
    pub fn evict_if_over(&mut self, capacity: usize) -> Option<CacheEntry> {
        let mut evicted = None;

        while self.entries.len() > capacity {
            let Some(key) = self.recency.evict_oldest() else {
                break;
            };
            if let Some(value) = self.entries.remove(&key) {
                debug!(key, "evicted least recently used entry");
                self.stats.record_eviction();
                evicted = Some(CacheEntry::new(key, value));
            }
        }

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Remove If Present ==
    /// Removes `key` from wherever it sits in the order.
    ///
    /// Remaining entries keep their relative order.
    pub fn remove_if_present(&mut self, key: i64) -> bool {
        if self.entries.remove(&key).is_some() {
            self.recency.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Snapshot ==
    /// Returns all entries from most to least recently used.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.recency
            .iter_most_recent()
            .filter_map(|key| {
                self.entries
                    .get(&key)
                    .map(|value| CacheEntry::new(key, value.clone()))
            })
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Invariants ==
    /// Verifies the capacity bound and that storage and order agree.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.entries.len() > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                len: self.entries.len(),
                capacity: self.capacity,
            });
        }

        let aligned = self.recency.is_consistent()
            && self.recency.len() == self.entries.len()
            && self.entries.keys().all(|key| self.recency.contains(*key));
        if !aligned {
            return Err(InvariantViolation::IndexMismatch {
                entries: self.entries.len(),
                indexed: self.recency.len(),
            });
        }

        Ok(())
    }

    pub fn contains(&self, key: i64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
