//! Control panel configuration.
//!
//! A small JSON file holding the controller poller timing and feature flag
//! overrides. It lives in the standard configuration directory
//! (`~/.config/padnav/config.json` on most platforms) unless
//! `PADNAV_CONFIG_PATH` points elsewhere. Every field is optional; a
//! missing file means defaults, a corrupt one is logged and ignored.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use padnav_types::PollerSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "PADNAV_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Controller poll and repeat timing.
    pub poller: PollerSettings,
    /// Feature flags forced on top of what the hardware reports, e.g.
    /// `"gpu.vendor.amd": false` to hide the AMD panel.
    pub features: BTreeMap<String, bool>,
}

impl PanelConfig {
    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("padnav")
        .join(CONFIG_FILE_NAME)
}

/// Reads the config at `path`. Only I/O failures other than "not found"
/// are errors.
pub fn load_config_from_path(path: &Path) -> Result<PanelConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded panel config");
                Ok(config)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file; using defaults"
                );
                Ok(PanelConfig::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PanelConfig::default()),
        Err(error) => Err(ConfigError::Io(error)),
    }
}
