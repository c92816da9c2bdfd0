use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration from `config.toml` in the store directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// The signed-in user; owner of everything created locally
    #[serde(default)]
    pub email: Option<String>,
    /// Extra owner whose data is visible read-only
    #[serde(default)]
    pub view_as: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize config.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("could not write config.toml: {0}")]
    WriteError(#[from] std::io::Error),
}

impl Config {
    /// Load `config.toml` from the store directory; a missing file is an
    /// empty config, not an error.
    pub fn load(store_dir: &Path) -> Result<Config, ConfigError> {
        let path = store_dir.join("config.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, store_dir: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        fs::write(store_dir.join("config.toml"), text)?;
        Ok(())
    }
}
