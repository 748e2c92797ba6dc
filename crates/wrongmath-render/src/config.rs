use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Presentation settings for rendered output.
///
/// Stored as JSON; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Run the normalizer before segmenting.
    pub normalize: bool,
    pub inline_class: String,
    pub block_class: String,
    /// Class applied to math that failed to render.
    pub error_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            inline_class: "math-inline".to_string(),
            block_class: "math-block".to_string(),
            error_class: "math-error".to_string(),
        }
    }
}

impl RenderConfig {
    /// Returns the default config file path: ~/.config/wrongmath/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wrongmath").join("config.json"))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&path) {
            Ok(config) => {
                log::info!("Loaded render config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
