//! API Module
//!
//! HTTP handlers and routing for the key-value REST API.
//!
//! # Endpoints
//! - `POST /create?key=K` - Create a row
//! - `GET /read?key=K` - Read through the cache
//! - `POST /update?key=K` - Update a row
//! - `DELETE /delete?key=K` - Delete a row
//! - `GET /print` - Dump cache contents
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
