use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dataeden_db::PoolSettings;
use dataeden_generate::AiSettings;

pub const DEFAULT_CONFIG_FILE: &str = "dataeden.toml";
pub const AI_KEY_ENV: &str = "DATAEDEN_AI_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pool: PoolConfig,
    pub ai: AiSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl PoolConfig {
    pub fn settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections.max(1),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
    /// JSON log file; stderr logging is used when absent.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

/// Load `path`, falling back to defaults when the file does not exist.
///
/// An empty `ai.api_key` is filled from `DATAEDEN_AI_KEY`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        AppConfig::default()
    };

    if config.ai.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var(AI_KEY_ENV) {
            config.ai.api_key = key;
        }
    }
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pool.settings().max_connections, 5);
        assert_eq!(config.ai.model, "deepseek-chat");
        assert_eq!(config.ai.max_tokens, 8192);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = parse_config(
            r#"
            [pool]
            acquire_timeout_secs = 3

            [ai]
            api_key = "sk-test"
            temperature = 0.2

            [logging]
            json = true
            file = "logs/dataeden.log"
            "#,
        )
        .expect("parse");
        assert_eq!(config.pool.max_connections, 5);
        assert_eq!(config.pool.settings().acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.ai.api_key, "sk-test");
        assert_eq!(config.ai.request_timeout_secs, 120);
        assert!(config.logging.json);
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/dataeden.log")));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn malformed_file_names_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dataeden.toml");
        std::fs::write(&path, "[pool\nmax_connections = ").expect("write");
        let err = load_config(&path).expect_err("malformed");
        assert!(err.to_string().contains("dataeden.toml"));
    }
}
