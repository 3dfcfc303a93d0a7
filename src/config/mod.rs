//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use lwc_mobile::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".lwc-mobile");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "ios:\n  min_supported_runtime: \"14.0\"\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.ios.min_supported_runtime, "14.0");
//! ```
//!
//! # Configuration File Locations
//!
//! Discovered and merged in this order:
//! 1. Project config (`.lwc-mobile/config.yml`)
//! 2. Local overrides (`.lwc-mobile/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{AndroidConfig, ChecksConfig, IosConfig, MobileConfig};
pub use validator::{parse_api_level, validate, validate_config, ValidationError};
