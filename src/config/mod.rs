//! Configuration system for yschema.
//!
//! This module provides the configuration structure with sensible defaults
//! and support for serialization/deserialization via serde. Configuration is
//! loaded from a TOML file and merged with command-line arguments.
//!
//! # Example
//!
//! ```
//! use yschema::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.root_type, None);
//! assert_eq!(config.max_completions, 50);
//!
//! let custom = Config {
//!     max_completions: 10,
//!     ..Config::default()
//! };
//! assert!(custom.report_deprecated);
//! ```

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// Configuration for yschema.
///
/// # Fields
///
/// * `schema` - Schema definition used when none is given on the command line (default: none)
/// * `root_type` - Type documents start at, overriding the schema's `root` (default: none)
/// * `report_deprecated` - Report uses of deprecated properties when checking (default: true)
/// * `include_deprecated_completions` - Offer deprecated properties as completions (default: false)
/// * `max_completions` - Maximum number of completion proposals (default: 50)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default schema definition file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    /// Name of the type documents start at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_type: Option<String>,

    /// Report deprecated properties as warnings
    #[serde(default = "default_report_deprecated")]
    pub report_deprecated: bool,

    /// Offer deprecated properties as completions
    #[serde(default)]
    pub include_deprecated_completions: bool,

    /// Maximum number of completion proposals
    #[serde(default = "default_max_completions")]
    pub max_completions: usize,
}

/// Returns the default for reporting deprecated properties.
fn default_report_deprecated() -> bool {
    true
}

/// Returns the default completion limit.
fn default_max_completions() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            root_type: None,
            report_deprecated: default_report_deprecated(),
            include_deprecated_completions: false,
            max_completions: default_max_completions(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/yschema/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yschema");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!("ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(err) => {
                warn!("cannot read config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deprecated_default() {
        let config = Config::default();
        assert!(config.report_deprecated);
        assert!(!config.include_deprecated_completions);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = toml::from_str("max_completions = 5\n").unwrap();
        assert_eq!(config.max_completions, 5);
        assert!(config.report_deprecated);
        assert_eq!(config.schema, None);
    }
}
