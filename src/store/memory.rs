//! In-memory backing store
//!
//! Rows live in a HashMap behind a mutex and are lost on restart.
//! The store counts calls and can be switched into an outage, which makes it
//! the double of choice for exercising the service's failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::error;

use super::{BackingStore, StoreError, StoreResult};

/// Volatile backing store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<i64, String>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls served or refused so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Simulate an outage: every call fails until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Write a row directly, bypassing the call counter and outage switch.
    ///
    /// Stands in for mutations made by other writers of the table.
    pub fn insert_row(&self, key: i64, value: impl Into<String>) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(key, value.into());
        }
    }

    /// Remove a row directly, bypassing the call counter and outage switch.
    pub fn remove_row(&self, key: i64) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.remove(&key);
        }
    }

    /// Number of stored rows
    pub fn row_count(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    fn begin(&self, op: &'static str) -> StoreResult<MutexGuard<'_, HashMap<i64, String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            let err = StoreError::Unavailable("memory store is offline".to_string());
            error!(op, error = %err, "memory store call failed");
            return Err(err);
        }

        self.rows.lock().map_err(|_| {
            let err = StoreError::Unavailable("memory store lock poisoned".to_string());
            error!(op, error = %err, "memory store call failed");
            err
        })
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: i64) -> StoreResult<Option<String>> {
        let rows = self.begin("get")?;
        Ok(rows.get(&key).cloned())
    }

    async fn insert(&self, key: i64, value: &str) -> StoreResult<()> {
        let mut rows = self.begin("insert")?;
        if rows.contains_key(&key) {
            let err = StoreError::DuplicateKey(key);
            error!(op = "insert", error = %err, "memory store call failed");
            return Err(err);
        }
        rows.insert(key, value.to_string());
        Ok(())
    }

    async fn update_if_exists(&self, key: i64, value: &str) -> StoreResult<u64> {
        let mut rows = self.begin("update")?;
        match rows.get_mut(&key) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_if_exists(&self, key: i64) -> StoreResult<u64> {
        let mut rows = self.begin("delete")?;
        Ok(u64::from(rows.remove(&key).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();

        store.insert(1, "one").await.unwrap();

        assert_eq!(store.get(1).await.unwrap(), Some("one".to_string()));
        assert_eq!(store.get(2).await.unwrap(), None);
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let store = MemoryStore::new();

        store.insert(1, "one").await.unwrap();
        let result = store.insert(1, "again").await;

        assert!(matches!(result, Err(StoreError::DuplicateKey(1))));
        assert_eq!(store.get(1).await.unwrap(), Some("one".to_string()));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_rows() {
        let store = MemoryStore::new();
        store.insert_row(5, "five");

        assert_eq!(store.update_if_exists(5, "FIVE").await.unwrap(), 1);
        assert_eq!(store.update_if_exists(6, "six").await.unwrap(), 0);
        assert_eq!(store.delete_if_exists(5).await.unwrap(), 1);
        assert_eq!(store.delete_if_exists(5).await.unwrap(), 0);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_outage_fails_every_call() {
        let store = MemoryStore::new();
        store.insert_row(1, "one");
        store.set_unavailable(true);

        assert!(matches!(store.get(1).await, Err(StoreError::Unavailable(_))));
        assert!(store.insert(2, "two").await.is_err());
        assert!(store.update_if_exists(1, "x").await.is_err());
        assert!(store.delete_if_exists(1).await.is_err());
        assert_eq!(store.row_count(), 1);

        store.set_unavailable(false);
        assert_eq!(store.get(1).await.unwrap(), Some("one".to_string()));
    }
}
