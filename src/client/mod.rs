// src/client/mod.rs
mod api;

pub use api::{resolve_api_base, ApiClient, ApiError, HealthStatus};
