//! Configuration loading
//!
//! Reads `~/.config/tripfield/config.toml` (or an explicit path). A missing
//! file yields defaults; a malformed one is an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::TripfieldError;

mod types;

pub use types::{Config, FieldConfig, SourceConfig, SourceKind};

const CONFIG_DIR: &str = "tripfield";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load from the default location, falling back to defaults
pub fn load_config() -> Result<Config, TripfieldError> {
    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, TripfieldError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config, TripfieldError> {
    let config: Config =
        toml::from_str(content).map_err(|e| TripfieldError::Config(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Reject settings the field cannot work with
pub fn validate(config: &Config) -> Result<(), TripfieldError> {
    if config.field.min_query_length == 0 {
        return Err(TripfieldError::Config(
            "field.min_query_length must be at least 1".to_string(),
        ));
    }
    if config.source.kind == SourceKind::Http
        && config
            .source
            .endpoint
            .as_ref()
            .is_none_or(|e| e.trim().is_empty())
    {
        return Err(TripfieldError::Config(
            "source.endpoint is required when source.kind = \"http\"".to_string(),
        ));
    }
    Ok(())
}

/// Render the effective configuration as TOML
pub fn dump_config(config: &Config) -> Result<String, TripfieldError> {
    toml::to_string_pretty(config).map_err(|e| TripfieldError::Config(e.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
