// src/client/api.rs
use crate::config::{API_BASE_ENV, DEFAULT_API_BASE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Healthcheck failed: HTTP {status}")]
    HealthCheckFailed { status: StatusCode },

    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Invalid health response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// `NEXT_PUBLIC_API_BASE` when set and non-empty, otherwise the local
/// backend address.
pub fn resolve_api_base<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(API_BASE_ENV)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Thin client for the backend service. One request per call: no retries,
/// no timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Client for the base named by `NEXT_PUBLIC_API_BASE`, ignoring any
    /// config file.
    pub fn from_env() -> Self {
        Self::new(resolve_api_base(|key| std::env::var(key).ok()))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base)
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.health_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::Request)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Health check against {} returned HTTP {}", url, status);
            return Err(ApiError::HealthCheckFailed { status });
        }

        response.json::<HealthStatus>().await.map_err(ApiError::Decode)
    }
}
