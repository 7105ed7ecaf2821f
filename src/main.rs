//! LRU KV - A key-value access layer with a bounded in-memory cache
//!
//! Serves create/read/update/delete over HTTP against a SQLite table, with
//! an LRU cache absorbing repeated reads.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_kv::api::{create_router, AppState};
use lru_kv::config::{Config, StoreBackend};
use lru_kv::store::{BackingStore, MemoryStore, SqliteStore};

/// Main entry point for the key-value server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the backing store, provisioning its table
/// 4. Create the cache and service
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_kv=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LRU KV server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, port={}, backend={:?}, database={}, store_timeout={:?}",
        config.cache_capacity,
        config.server_port,
        config.store_backend,
        config.database_path.display(),
        config.store_timeout
    );

    let store: Arc<dyn BackingStore> = match config.store_backend {
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::open(&config.database_path, config.store_timeout).with_context(|| {
                format!(
                    "failed to initialise database at {}",
                    config.database_path.display()
                )
            })?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Backing store ready: {}", store.name());

    let state = AppState::with_store(config.cache_capacity, store);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
