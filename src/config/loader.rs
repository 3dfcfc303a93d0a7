//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! the project in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::MobileConfig;
use crate::error::{MobileError, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".lwc-mobile";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.lwc-mobile/config.yml`)
/// 2. Local overrides (`.lwc-mobile/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .lwc-mobile/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .lwc-mobile/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if any config file exists.
    pub fn has_any(&self) -> bool {
        self.project.is_some() || self.project_local.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.lwc-mobile` directory (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file and parse it into [`MobileConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<MobileConfig> {
    let value = load_config_value(path)?;
    from_value(value, path)
}

/// Parse YAML content into [`MobileConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<MobileConfig> {
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| MobileError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_value(value, source_path)
}

/// Load a config file as a raw YAML value (for merging).
///
/// An empty file loads as an empty mapping.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MobileError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MobileError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| MobileError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Load and merge the project's config files.
///
/// A project without config files gets the defaults.
pub fn load_merged_config(project_root: &Path) -> Result<MobileConfig> {
    let paths = ConfigPaths::discover(project_root);
    if !paths.has_any() {
        tracing::debug!(root = %project_root.display(), "No config files, using defaults");
        return Ok(MobileConfig::default());
    }

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!(path = %path.display(), "Loading config");
        configs.push(load_config_value(path)?);
    }

    from_value(
        merge_configs(&configs),
        &project_root.join(CONFIG_DIR).join("config.yml"),
    )
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges the project's config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<MobileConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

fn from_value(value: Value, source_path: &Path) -> Result<MobileConfig> {
    let value = if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    };
    serde_yaml::from_value(value).map_err(|e| MobileError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
