// Launcher configuration handling.
// Loads, validates, and persists the cache launcher's JSON configuration file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Cache launcher configuration document.
///
/// Every field is required; a document missing any of them, or carrying a
/// value of the wrong type, is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    pub app_name: String,
    pub version: String,
    pub settings: Settings,
    pub paths: LauncherPaths,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub ui: UiSettings,
    pub log_level: String,
}

/// UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub gui: bool,
    pub theme: String,
}

/// Filesystem locations used by the launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherPaths {
    pub cache_directory: String,
    pub log_file: String,
}

impl LauncherConfig {
    /// Validate a parsed JSON document against the configuration schema.
    pub fn from_value(value: Value) -> Result<Self> {
        debug!("validating configuration document");
        serde_json::from_value(value).map_err(|e| Error::ConfigValidation(e.to_string()))
    }
}

/// Handler for reading and writing the launcher configuration file.
///
/// The document is re-read and re-validated on every call; nothing is cached
/// between calls.
#[derive(Debug, Clone)]
pub struct ConfigHandler {
    config_path: PathBuf,
}

impl ConfigHandler {
    /// Create a handler using the default config location
    /// (~/.config/cache-launcher/config.json on Linux).
    pub fn new() -> Option<Self> {
        ProjectDirs::from("", "", "cache-launcher")
            .map(|dirs| Self::with_path(dirs.config_dir().join("config.json")))
    }

    /// Create a handler for an explicit config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let config_path = path.into();
        debug!(path = %config_path.display(), "initialized config handler");
        Self { config_path }
    }

    /// Path to the configuration file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read and validate the configuration file.
    pub fn get_config(&self) -> Result<LauncherConfig> {
        if !self.config_path.exists() {
            return Err(Error::ConfigNotFound(self.config_path.clone()));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let document: Value = serde_json::from_str(&contents).map_err(Error::ConfigParse)?;
        LauncherConfig::from_value(document)
    }

    /// Write the configuration file, pretty-printed.
    ///
    /// The write goes through a temp file and rename so a failure can never
    /// leave a partially written config behind.
    pub fn save_config(&self, config: &LauncherConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).map_err(Error::ConfigSerialization)?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.config_path)?;

        info!(path = %self.config_path.display(), "configuration saved");
        Ok(())
    }
}
