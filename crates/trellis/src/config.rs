//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use trellis_sync::FlushConfig;
use trellis_ui::UiConfig;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application configuration. Missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub flush: FlushConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"ui": {"connector_id_prefix": "c"}}"#).unwrap();
        assert_eq!(config.ui.connector_id_prefix, "c");
        assert!(config.ui.forget_hidden_state);
        assert_eq!(config.flush, FlushConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Config::from_json("{"), Err(ConfigError::Json(_))));
    }
}
