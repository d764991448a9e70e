//! Configuration management for truthscan services.
//!
//! Services share a configuration file at `~/.truthscan/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `TRUTHSCAN_PORT` → network.port
//! - `TRUTHSCAN_BIND_ADDRESS` → network.bind
//! - `TRUTHSCAN_LOG_LEVEL` → observability.log_level
//! - `TRUTHSCAN_LOG_FORMAT` → observability.log_format
//! - `TRUTHSCAN_DATA_DIR` → datasets.dir
//! - `TRUTHSCAN_MODEL` → classifier.model
//! - `OPENAI_API_KEY` → classifier.api_key
//! - `OPENAI_BASE_URL` → classifier.base_url

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".truthscan"),
        |dirs| dirs.home_dir().join(".truthscan"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address. Default: "127.0.0.1" (local only)
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Listener port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4480
}

// ============================================================================
// Classifier Configuration
// ============================================================================

/// External classification API (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// API base URL, without the `/v1/...` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model used for classification
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound for a single classification call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Initial API key. Can be replaced at runtime through the API.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_timeout_secs() -> u64 {
    30
}

// ============================================================================
// Dataset Configuration
// ============================================================================

/// Location of the bundled CSV sample datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetsConfig {
    /// Directory holding `fake.csv`, `real.csv` and `manual_testing.csv`
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

// ============================================================================
// Observability Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration shared by truthscan services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub datasets: DatasetsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides applied.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("TRUTHSCAN_PORT") {
            match port.parse() {
                Ok(p) => self.network.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid TRUTHSCAN_PORT"),
            }
        }
        if let Some(bind) = lookup("TRUTHSCAN_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Some(level) = lookup("TRUTHSCAN_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("TRUTHSCAN_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(dir) = lookup("TRUTHSCAN_DATA_DIR") {
            self.datasets.dir = PathBuf::from(dir);
        }
        if let Some(model) = lookup("TRUTHSCAN_MODEL") {
            self.classifier.model = model;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.classifier.base_url = url;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.classifier.api_key = Some(key);
            }
        }
    }

    /// Validate field ranges.
    pub fn validate(&self) -> crate::Result<()> {
        if self.network.port == 0 {
            return Err(Error::Config("network.port must be non-zero".into()));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(Error::Config(
                "classifier.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.classifier.model.trim().is_empty() {
            return Err(Error::Config("classifier.model must not be empty".into()));
        }
        if !matches!(self.observability.log_format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "observability.log_format must be 'json' or 'pretty', got '{}'",
                self.observability.log_format
            )));
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.network.bind, self.network.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.network.bind, "127.0.0.1");
        assert_eq!(config.network.port, 4480);
        assert_eq!(config.classifier.model, "gpt-4o");
        assert_eq!(config.classifier.timeout_secs, 30);
        assert!(config.classifier.api_key.is_none());
        assert_eq!(config.listen_addr(), "127.0.0.1:4480");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"network": {{"port": 9000}}, "observability": {{"level": "debug"}}}}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.network.port, 9000);
        assert_eq!(config.network.bind, "127.0.0.1");
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.classifier.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRUTHSCAN_PORT", "5000"),
            ("TRUTHSCAN_DATA_DIR", "/srv/data"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TRUTHSCAN_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.network.port, 5000);
        assert_eq!(config.datasets.dir, PathBuf::from("/srv/data"));
        assert_eq!(config.classifier.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.observability.log_format, "json");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "TRUTHSCAN_PORT").then(|| "abc".to_string()));
        assert_eq!(config.network.port, 4480);
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert!(config.classifier.api_key.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.classifier.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.model = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.classifier.api_key = Some("sk-secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
