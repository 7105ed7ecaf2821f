//! SQLite backing store
//!
//! Persists rows in a single `kv_store` table. Every call opens its own
//! connection and runs exactly one transaction on the blocking pool, bounded
//! by the configured timeout.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};
use tracing::{error, info};

use super::{BackingStore, StoreError, StoreResult};

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS kv_store (key INTEGER PRIMARY KEY, value TEXT NOT NULL)";

/// Extra wait past the deadline for a transaction that is already committing.
const COMMIT_GRACE: Duration = Duration::from_millis(250);

/// Durable backing store over a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    timeout: Duration,
}

impl SqliteStore {
    /// Opens the database at `path`, creating the `kv_store` table if needed.
    ///
    /// # Arguments
    /// * `path` - SQLite database file, created if missing
    /// * `timeout` - upper bound for every subsequent store call
    pub fn open(path: impl Into<PathBuf>, timeout: Duration) -> StoreResult<Self> {
        let store = Self {
            path: path.into(),
            timeout,
        };

        let conn = connect(&store.path, timeout)?;
        conn.execute(CREATE_TABLE, [])?;
        info!(path = %store.path.display(), "kv_store table ready");

        Ok(store)
    }

    /// Runs `work` inside one transaction on a fresh connection.
    ///
    /// On timeout the blocking task is abandoned, not cancelled. It rolls
    /// back instead of committing once the deadline has passed, so a late
    /// commit needs the commit itself to outlast [`COMMIT_GRACE`].
    async fn run<T, F>(&self, op: &'static str, key: i64, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> StoreResult<T> + Send + 'static,
    {
        let path = self.path.clone();
        let busy = self.timeout;
        let deadline = Instant::now() + self.timeout;

        let task = tokio::task::spawn_blocking(move || -> StoreResult<T> {
            let mut conn = connect(&path, busy)?;
            let tx = conn.transaction()?;
            let out = work(&tx)?;
            if Instant::now() >= deadline {
                // Dropping the transaction rolls it back
                return Err(StoreError::Timeout(busy));
            }
            tx.commit()?;
            Ok(out)
        });

        let result = match tokio::time::timeout(self.timeout + COMMIT_GRACE, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(StoreError::Unavailable(join.to_string())),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        };

        if let Err(err) = &result {
            error!(op, key, error = %err, "sqlite store call failed");
        }
        result
    }
}

fn connect(path: &Path, busy: Duration) -> StoreResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy)?;
    Ok(conn)
}

#[async_trait]
impl BackingStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: i64) -> StoreResult<Option<String>> {
        self.run("get", key, move |tx| {
            let value: Option<String> = tx
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn insert(&self, key: i64, value: &str) -> StoreResult<()> {
        let value = value.to_string();
        self.run("insert", key, move |tx| {
            tx.execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(ref failure, _)
                    if failure.code == ErrorCode::ConstraintViolation =>
                {
                    StoreError::DuplicateKey(key)
                }
                other => StoreError::Sqlite(other),
            })?;
            Ok(())
        })
        .await
    }

    async fn update_if_exists(&self, key: i64, value: &str) -> StoreResult<u64> {
        let value = value.to_string();
        self.run("update", key, move |tx| {
            let rows = tx.execute(
                "UPDATE kv_store SET value = ?1 WHERE key = ?2",
                params![value, key],
            )?;
            Ok(rows as u64)
        })
        .await
    }

    async fn delete_if_exists(&self, key: i64) -> StoreResult<u64> {
        self.run("delete", key, move |tx| {
            let rows = tx.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
            Ok(rows as u64)
        })
        .await
    }
}
