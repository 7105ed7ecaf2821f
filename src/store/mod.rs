//! Backing Store Module
//!
//! The durable side of the access layer. A backing store owns the
//! authoritative rows; the cache only ever holds a projection of them.
//!
//! # Implementations
//! - [`SqliteStore`] - `kv_store` table in a SQLite database file
//! - [`MemoryStore`] - volatile map, used for tests and throwaway deployments

mod memory;
mod sqlite;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

// == Store Error ==
/// Failure to run a store operation at all.
///
/// "Row not found" is never an error; it is reported as `None` or as zero
/// rows affected.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Insert hit the primary-key constraint
    #[error("key {0} already exists")]
    DuplicateKey(i64),

    /// SQLite rejected the statement or the connection failed
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The call did not finish within the configured bound
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backing store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Backing Store Trait ==
/// Narrow CRUD interface over the persisted key-value table.
///
/// Each call is one independent unit of work. Implementations never retry.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Returns the stored value, or `None` when no row exists.
    async fn get(&self, key: i64) -> StoreResult<Option<String>>;

    /// Inserts a new row. Fails with [`StoreError::DuplicateKey`] if the key exists.
    async fn insert(&self, key: i64, value: &str) -> StoreResult<()>;

    /// Overwrites an existing row. Returns the number of rows affected.
    async fn update_if_exists(&self, key: i64, value: &str) -> StoreResult<u64>;

    /// Deletes a row. Returns the number of rows affected.
    async fn delete_if_exists(&self, key: i64) -> StoreResult<u64>;
}
