//! User configuration
//!
//! Read from `$PEBBLE_CONFIG`, or `<config dir>/pebble/config.toml`:
//! ```toml
//! registry_dir = "/home/me/.pebble-registry"
//! log_level = "info"
//! ```
//! A missing file means defaults. `PEBBLE_REGISTRY_DIR` overrides
//! `registry_dir`.

use anyhow::{Context, Result};
use engine::FileRegistry;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PEBBLE_CONFIG";
/// Environment variable naming the registry directory
pub const REGISTRY_ENV: &str = "PEBBLE_REGISTRY_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding one JSON entry per registered project
    pub registry_dir: Option<PathBuf>,
    /// Log level used when no -v flag is given
    pub log_level: Option<String>,
}

impl Config {
    /// Registry location: environment, then config file, then data dir
    pub fn registry_dir(&self) -> Result<PathBuf> {
        resolve_registry_dir(
            env::var_os(REGISTRY_ENV).map(PathBuf::from),
            self.registry_dir.clone(),
            dirs::data_dir(),
        )
    }

    pub fn registry(&self) -> Result<FileRegistry> {
        Ok(FileRegistry::new(self.registry_dir()?))
    }
}

fn resolve_registry_dir(
    from_env: Option<PathBuf>,
    from_file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    from_env
        .filter(|p| !p.as_os_str().is_empty())
        .or(from_file)
        .or_else(|| data_dir.map(|d| d.join("pebble").join("registry")))
        .context("Could not determine the registry directory; set PEBBLE_REGISTRY_DIR")
}

/// Config file location
pub fn config_file_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|d| d.join("pebble").join("config.toml")),
    }
}

/// Load the user configuration
pub fn load() -> Result<Config> {
    match config_file_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load configuration from a specific file; missing means defaults
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
