/// Application configuration
///
/// Read once at startup from `<config dir>/compose-library/config.json`.
/// Every key is optional; a missing file means all defaults.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::state::data::ANONYMOUS_AUTHOR;

const APP_DIR: &str = "compose-library";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Author recorded when the add form leaves it blank
    pub default_author: String,
    /// Start with the bundled sample recipes
    pub seed_samples: bool,
    /// Write exports straight into this directory instead of asking
    pub export_dir: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_author: ANONYMOUS_AUTHOR.to_string(),
            seed_samples: true,
            export_dir: None,
            log_filter: "compose_library=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Where the config file lives on this platform:
    /// - Linux: ~/.config/compose-library/config.json
    /// - macOS: ~/Library/Application Support/compose-library/config.json
    /// - Windows: %APPDATA%\compose-library\config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when the
    /// platform has no config directory or the file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
