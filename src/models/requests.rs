//! Request DTOs for the key-value API
//!
//! Defines the query parameters of incoming requests and the validation
//! performed before a request reaches the service.

use serde::Deserialize;

use crate::error::{KvError, Result};

/// Query string carrying the row key (`?key=42`)
///
/// The key is kept as raw text so a missing or malformed key is reported
/// with our own error body rather than the extractor's.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyParams {
    /// Raw key text
    #[serde(default)]
    pub key: Option<String>,
}

impl KeyParams {
    /// Parses the key as an integer.
    pub fn parse_key(&self) -> Result<i64> {
        let raw = self
            .key
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| KvError::InvalidRequest("Missing key parameter".to_string()))?;

        raw.parse::<i64>()
            .map_err(|_| KvError::InvalidRequest(format!("Key '{}' is not an integer", raw)))
    }
}

/// Validates a request body used as a value for create/update.
pub fn validate_value(body: String) -> Result<String> {
    if body.is_empty() {
        return Err(KvError::InvalidRequest("Missing value".to_string()));
    }
    Ok(body)
}
