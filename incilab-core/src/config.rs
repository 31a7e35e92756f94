use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides the configured backend address.
pub const BACKEND_URL_ENV: &str = "INCILAB_BACKEND_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the incilab client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Connection settings for the ingredient backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base address of the backend (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Optional per-request timeout. Unset means the request may wait
    /// indefinitely and the owning session stays Loading until it resolves.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `config.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load("config.yaml").unwrap_or_default()
    }

    /// The backend address to use, with the `INCILAB_BACKEND_URL`
    /// environment variable taking precedence over the config file.
    pub fn backend_url(&self) -> String {
        std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| self.backend.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert!(config.backend.request_timeout_secs.is_none());
    }

    #[test]
    fn test_parse_backend_section() {
        let yaml = "backend:\n  base_url: http://inci.internal:9000\n  request_timeout_secs: 30\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "http://inci.internal:9000");
        assert_eq!(config.backend.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_backend_section_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }
}
