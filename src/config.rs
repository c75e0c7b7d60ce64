//! Configuration loader and validator for the ordering client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub ordering: Ordering,
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Backend {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Accept self-signed certificates. Development servers only.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Ignore `HTTP(S)_PROXY` and connect directly.
    #[serde(default)]
    pub bypass_proxy: bool,
}

/// Ordering-session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ordering {
    pub table_refresh_secs: u64,
}

impl Backend {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Ordering {
    pub fn table_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.table_refresh_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend {
                base_url: "https://10.0.2.2:7154/api".into(),
                connect_timeout_ms: 10_000,
                read_timeout_ms: 15_000,
                accept_invalid_certs: false,
                bypass_proxy: false,
            },
            ordering: Ordering {
                table_refresh_secs: 10,
            },
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let base_url = cfg.backend.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Invalid("backend.base_url must be non-empty"));
    }
    match Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(ConfigError::Invalid(
                "backend.base_url must be an absolute http(s) URL",
            ))
        }
    }
    if cfg.backend.connect_timeout_ms == 0 {
        return Err(ConfigError::Invalid("backend.connect_timeout_ms must be > 0"));
    }
    if cfg.backend.read_timeout_ms == 0 {
        return Err(ConfigError::Invalid("backend.read_timeout_ms must be > 0"));
    }
    if cfg.ordering.table_refresh_secs == 0 {
        return Err(ConfigError::Invalid("ordering.table_refresh_secs must be > 0"));
    }
    Ok(())
}

/// Returns a complete example configuration.
pub fn example() -> &'static str {
    r#"backend:
  base_url: "https://10.0.2.2:7154/api"
  connect_timeout_ms: 10000
  read_timeout_ms: 15000
  # Only for a development server with a self-signed certificate.
  accept_invalid_certs: false
  # Connect directly even when HTTP(S)_PROXY is set.
  bypass_proxy: false

ordering:
  table_refresh_secs: 10
"#
}
