//! Configuration loading and validation.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, then the `LAMBDA_ENDPOINT` environment variable. CLI flags are
//! applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Environment variable holding the analysis endpoint.
pub const ENDPOINT_ENV: &str = "LAMBDA_ENDPOINT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Analysis service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Lambda endpoint; the proxy routes answer 503 while unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Deadline for `/api/analyze` in seconds
    #[serde(default = "default_analyze_timeout")]
    pub analyze_timeout_seconds: u64,

    /// Deadline for `/api/search-player` in seconds
    #[serde(default = "default_search_timeout")]
    pub search_timeout_seconds: u64,
}

fn default_analyze_timeout() -> u64 {
    30
}

fn default_search_timeout() -> u64 {
    25
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            analyze_timeout_seconds: default_analyze_timeout(),
            search_timeout_seconds: default_search_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Parsed endpoint. Blank values count as unset.
    pub fn endpoint_url(&self) -> Result<Option<Url>, ConfigError> {
        match self.endpoint.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw).map(Some).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid upstream endpoint {:?}: {}", raw, e))
            }),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Override the endpoint with a non-empty environment value.
    pub fn apply_endpoint_override(&mut self, value: Option<String>) {
        if let Some(endpoint) = value.filter(|v| !v.trim().is_empty()) {
            self.upstream.endpoint = Some(endpoint);
        }
    }

    /// Apply `LAMBDA_ENDPOINT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.analyze_timeout_seconds == 0 || self.upstream.search_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeouts must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        self.upstream.endpoint_url()?;
        Ok(())
    }
}
