//! Request and Response models for the key-value API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! parsing requests and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_value, KeyParams};
pub use responses::{DumpResponse, HealthResponse, ReadResponse, StatsResponse, WriteResponse};
