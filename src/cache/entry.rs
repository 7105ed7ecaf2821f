//! Cache Entry Module
//!
//! Defines the key-value pair held by the LRU cache.

use serde::Serialize;

// == Cache Entry ==
/// A single cached row: an integer key and its string value.
///
/// Entries only exist inside an [`LruCache`](super::LruCache); copies handed
/// out by `snapshot` or eviction are detached from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// The row key
    pub key: i64,
    /// The cached value
    pub value: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}
