//! Configuration loading
//!
//! Config file resolution priority:
//! 1. Explicit path argument (highest priority)
//! 2. `METAOPS_CONFIG` environment variable
//! 3. Platform config file (`<config_dir>/metaops/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! An explicitly requested file (1 or 2) that cannot be read is an error.
//! A broken platform config file only produces a warning and the defaults.
//! `METAOPS_LOG_LEVEL` overrides `[logging] level` after loading.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "METAOPS_CONFIG";

/// Environment variable overriding the configured log level
pub const LOG_LEVEL_ENV_VAR: &str = "METAOPS_LOG_LEVEL";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tag writer configuration (optional)
    #[serde(default)]
    pub tagger: TaggerConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Tag writer configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaggerConfig {
    /// ID3v2 revision written to MP3 files ("2.4" or "2.3")
    #[serde(default = "default_id3_version")]
    pub id3_version: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            id3_version: default_id3_version(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_id3_version() -> String {
    "2.4".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply environment overrides on top of the loaded values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV_VAR) {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }
    }
}

/// Load configuration following the resolution priority documented above
pub fn load_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let mut config = if let Some(path) = explicit_path {
        // Priority 1: explicit argument
        TomlConfig::from_file(path)?
    } else if let Some(path) = env_config_path() {
        // Priority 2: environment variable
        TomlConfig::from_file(&path)?
    } else if let Some(path) = platform_config_path().filter(|p| p.exists()) {
        // Priority 3: platform config file
        match TomlConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable config file, using defaults"
                );
                TomlConfig::default()
            }
        }
    } else {
        // Priority 4: compiled defaults
        debug!("No config file found, using defaults");
        TomlConfig::default()
    };

    config.apply_env_overrides();
    Ok(config)
}

fn env_config_path() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Platform config file location, if the platform has a config directory
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("metaops").join("config.toml"))
}
