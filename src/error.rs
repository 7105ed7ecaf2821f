//! Error types for the key-value service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

// == KV Error Enum ==
/// Unified error type for the key-value service.
///
/// `NotFound` is an expected outcome, kept apart from `StoreFailure` so the
/// two are never conflated at the boundary.
#[derive(Error, Debug)]
pub enum KvError {
    /// Missing or malformed key, or empty value
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Neither cache nor store holds the key
    #[error("Key not found: {0}")]
    NotFound(i64),

    /// The backing store could not run the operation
    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = match &self {
            KvError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            KvError::NotFound(_) => StatusCode::NOT_FOUND,
            KvError::StoreFailure(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value service.
pub type Result<T> = std::result::Result<T, KvError>;
