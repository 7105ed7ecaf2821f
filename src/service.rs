//! KV Service
//!
//! Keeps the LRU cache consistent with the backing store across create,
//! read, update and delete.
//!
//! # Protocol
//! - Read: cache first; on a miss read the store and populate the cache
//! - Create: insert into the store, cache only if the insert succeeded
//! - Update: update the store, mirror into the cache only if already cached;
//!   drop the cache entry when the store fails
//! - Delete: delete from the store, always drop the cache entry
//!
//! The service holds no state of its own beyond the two components.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, LruCache};
use crate::error::{KvError, Result};
use crate::store::BackingStore;

// == Outcomes ==
/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Cache,
    Store,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Cache => f.write_str("cache"),
            ValueSource::Store => f.write_str("store"),
        }
    }
}

/// A successful read, tagged with its source.
///
/// Renders as `cache:<value>` or `store:<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub key: i64,
    pub value: String,
    pub source: ValueSource,
}

impl fmt::Display for ReadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.value)
    }
}

/// A successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Created => f.write_str("created"),
            WriteOutcome::Updated => f.write_str("updated"),
            WriteOutcome::Deleted => f.write_str("deleted"),
        }
    }
}

// == KV Service ==
/// Read-through / write-through orchestration over an [`LruCache`] and a
/// [`BackingStore`].
///
/// The cache lock is held for the whole of each operation, store round-trip
/// included, so concurrent requests are applied one at a time.
pub struct KvService {
    cache: Mutex<LruCache>,
    store: Arc<dyn BackingStore>,
}

impl KvService {
    /// Creates a service over an owned cache and a shared store.
    pub fn new(cache: LruCache, store: Arc<dyn BackingStore>) -> Self {
        Self {
            cache: Mutex::new(cache),
            store,
        }
    }

    // == Create ==
    /// Inserts a new row and caches it once the store has accepted it.
    pub async fn create(&self, key: i64, value: String) -> Result<WriteOutcome> {
        let mut cache = self.cache.lock().await;

        if let Err(err) = self.store.insert(key, &value).await {
            warn!(key, store = self.store.name(), error = %err, "create failed, nothing cached");
            return Err(err.into());
        }

        // A cached key with no row can only come from writers outside this
        // service; refresh it rather than insert twice.
        if !cache.update_if_present(key, value.clone()) {
            cache.put(key, value);
        }

        info!(key, "created");
        Ok(WriteOutcome::Created)
    }

    // == Read ==
    /// Returns the value for `key`, from the cache when possible.
    pub async fn read(&self, key: i64) -> Result<ReadOutcome> {
        let mut cache = self.cache.lock().await;

        if let Some(value) = cache.get(key) {
            debug!(key, "cache hit");
            return Ok(ReadOutcome {
                key,
                value,
                source: ValueSource::Cache,
            });
        }

        let value = match self.store.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key, "not found in cache or store");
                return Err(KvError::NotFound(key));
            }
            Err(err) => {
                warn!(key, store = self.store.name(), error = %err, "read-through failed");
                return Err(err.into());
            }
        };

        cache.put(key, value.clone());
        debug!(key, "cache miss, populated from store");

        Ok(ReadOutcome {
            key,
            value,
            source: ValueSource::Store,
        })
    }

    // == Update ==
    /// Overwrites an existing row and mirrors the value into the cache if
    /// the key is cached. Never inserts into the cache.
    pub async fn update(&self, key: i64, value: String) -> Result<WriteOutcome> {
        let mut cache = self.cache.lock().await;

        match self.store.update_if_exists(key, &value).await {
            Ok(0) => {
                // No row: whatever the cache holds for this key is stale
                if cache.remove_if_present(key) {
                    warn!(key, "dropped stale cache entry for missing row");
                }
                Err(KvError::NotFound(key))
            }
            Ok(_) => {
                let cached = cache.update_if_present(key, value);
                info!(key, cached, "updated");
                Ok(WriteOutcome::Updated)
            }
            Err(err) => {
                // The write may still land (e.g. after a timeout); the cached
                // value can no longer be trusted either way
                let dropped = cache.remove_if_present(key);
                warn!(key, dropped, store = self.store.name(), error = %err, "update failed");
                Err(err.into())
            }
        }
    }

    // == Delete ==
    /// Deletes the row and drops the key from the cache.
    ///
    /// The cache entry is removed whatever the store reports.
    pub async fn delete(&self, key: i64) -> Result<WriteOutcome> {
        let mut cache = self.cache.lock().await;

        let result = self.store.delete_if_exists(key).await;
        let cached = cache.remove_if_present(key);

        match result {
            Ok(0) => {
                debug!(key, cached, "delete found no row");
                Err(KvError::NotFound(key))
            }
            Ok(_) => {
                info!(key, cached, "deleted");
                Ok(WriteOutcome::Deleted)
            }
            Err(err) => {
                warn!(key, store = self.store.name(), error = %err, "delete failed");
                Err(err.into())
            }
        }
    }

    // == Dump ==
    /// Cache contents, most recently used first. The store is not consulted.
    pub async fn dump(&self) -> Vec<CacheEntry> {
        self.cache.lock().await.snapshot()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    pub async fn capacity(&self) -> usize {
        self.cache.lock().await.capacity()
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}
