// src/config/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable that overrides the backend base URL.
pub const API_BASE_ENV: &str = "NEXT_PUBLIC_API_BASE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than exactly `production` is a development build,
    /// including an unset or empty `NODE_ENV`.
    pub fn from_node_env(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

// Config files follow the same rule as `NODE_ENV`, so `staging` or `test`
// select development instead of failing to parse.
impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Environment::from_node_env(Some(&value)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: Environment,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            environment: Environment::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API base URL {0:?}: {1}")]
    InvalidApiBase(String, url::ParseError),

    #[error("API base URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("Invalid BIND_ADDR {0:?}")]
    InvalidBindAddr(String),
}

impl Config {
    /// Apply `NODE_ENV`, `NEXT_PUBLIC_API_BASE` and `BIND_ADDR` on top of
    /// whatever the file provided. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(node_env) = get("NODE_ENV") {
            self.environment = Environment::from_node_env(Some(&node_env));
        }

        if let Some(api_base) = get(API_BASE_ENV) {
            self.api_base = api_base;
        }

        if let Some(addr) = get("BIND_ADDR") {
            self.server.bind_addr = addr
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(addr.clone()))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_base)
            .map_err(|e| ConfigError::InvalidApiBase(self.api_base.clone(), e))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(ConfigError::UnsupportedScheme(self.api_base.clone())),
        }
    }
}
