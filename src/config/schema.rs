//! Configuration schema.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Root configuration read from `.lwc-mobile/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MobileConfig {
    pub android: AndroidConfig,
    pub ios: IosConfig,
    pub checks: ChecksConfig,
}

/// Android SDK packages accepted by the setup checks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// Platform API packages, most preferred first (e.g. `android-29`).
    pub supported_runtimes: Vec<String>,

    /// Emulator image flavors (e.g. `default`, `google_apis`).
    pub supported_images: Vec<String>,

    /// Emulator ABIs (e.g. `x86_64`).
    pub architectures: Vec<String>,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            supported_runtimes: (23..=29).rev().map(|n| format!("android-{}", n)).collect(),
            supported_images: vec!["default".to_string(), "google_apis".to_string()],
            architectures: vec!["x86_64".to_string()],
        }
    }
}

/// iOS simulator runtimes accepted by the setup checks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IosConfig {
    /// Lowest simulator runtime version, as `major[.minor]`.
    pub min_supported_runtime: String,
}

impl Default for IosConfig {
    fn default() -> Self {
        Self {
            min_supported_runtime: "13.0".to_string(),
        }
    }
}

/// Settings applied to every requirement check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Reject a check that has not settled after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl ChecksConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}
