//! Service configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`HEALTH_ASSISTANT_*`)
//! 2. TOML file (`health_assistant.toml`, or `HEALTH_ASSISTANT_CONFIG`)
//! 3. Compiled defaults

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "HEALTH_ASSISTANT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "health_assistant.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the three ONNX model files.
    pub model_dir: PathBuf,
    /// Records shown under "Recent Activity" on the home page.
    pub recent_limit: usize,
    pub workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            model_dir: PathBuf::from("saved models"),
            recent_limit: 5,
            workers: 1,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Overrides fields from `HEALTH_ASSISTANT_HOST`, `_PORT` and `_MODEL_DIR`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HEALTH_ASSISTANT_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("HEALTH_ASSISTANT_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "HEALTH_ASSISTANT_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(dir) = lookup("HEALTH_ASSISTANT_MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "port = 9000\nmodel_dir = \"models\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.recent_limit, 5);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env = HashMap::from([
            ("HEALTH_ASSISTANT_PORT", "8181"),
            ("HEALTH_ASSISTANT_MODEL_DIR", "/srv/models"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 8181);
        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
    }

    #[test]
    fn bad_port_in_environment_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| (key == "HEALTH_ASSISTANT_PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
