//! API Handlers
//!
//! HTTP request handlers for each key-value endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::LruCache;
use crate::error::Result;
use crate::models::{
    validate_value, DumpResponse, HealthResponse, KeyParams, ReadResponse, StatsResponse,
    WriteResponse,
};
use crate::service::KvService;
use crate::store::BackingStore;

/// Application state shared across all handlers.
///
/// The service serializes access to the cache internally.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<KvService>,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: KvService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new AppState with a fresh cache of `capacity` over `store`.
    pub fn with_store(capacity: usize, store: Arc<dyn BackingStore>) -> Self {
        Self::new(KvService::new(LruCache::new(capacity), store))
    }
}

/// Handler for POST /create?key=K
///
/// The request body is the value.
pub async fn create_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    body: String,
) -> Result<(StatusCode, Json<WriteResponse>)> {
    let key = params.parse_key()?;
    let value = validate_value(body)?;

    let outcome = state.service.create(key, value).await?;
    Ok((StatusCode::CREATED, Json(WriteResponse::new(outcome, key))))
}

/// Handler for GET /read?key=K
pub async fn read_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
) -> Result<Json<ReadResponse>> {
    let key = params.parse_key()?;

    let outcome = state.service.read(key).await?;
    Ok(Json(outcome.into()))
}

/// Handler for POST /update?key=K
///
/// The request body is the new value.
pub async fn update_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    body: String,
) -> Result<Json<WriteResponse>> {
    let key = params.parse_key()?;
    let value = validate_value(body)?;

    let outcome = state.service.update(key, value).await?;
    Ok(Json(WriteResponse::new(outcome, key)))
}

/// Handler for DELETE /delete?key=K
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
) -> Result<Json<WriteResponse>> {
    let key = params.parse_key()?;

    let outcome = state.service.delete(key).await?;
    Ok(Json(WriteResponse::new(outcome, key)))
}

/// Handler for GET /print
///
/// Dumps the cache, most recently used first.
pub async fn print_handler(State(state): State<AppState>) -> Json<DumpResponse> {
    Json(DumpResponse {
        capacity: state.service.capacity().await,
        entries: state.service.dump().await,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.stats().await;
    let capacity = state.service.capacity().await;

    Json(StatsResponse::new(&stats, capacity))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.service.store_name()))
}
