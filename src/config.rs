//! User configuration, read from `config.toml` in the app's config directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_VOLUME;

pub const APP_DIR: &str = "jamendo-rs";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog API
    pub api_url: String,
    /// Server hosting the `/api/download` conversion endpoint
    pub download_server: String,
    /// Initial output volume in [0, 1]
    pub volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.jamendo.com/v3.0".to_string(),
            download_server: "http://localhost:8080".to_string(),
            volume: DEFAULT_VOLUME,
        }
    }
}

/// `<config_dir>/jamendo-rs`, if the platform has a config directory.
pub fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Load the config file, returning the defaults if it doesn't exist.
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}
