//! Configuration validation rules.
//!
//! Every rule runs, so a user sees all problems at once.

use crate::config::schema::MobileConfig;
use crate::error::{MobileError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &MobileConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let android = &config.android;
    for (field, values) in [
        ("android.supported_runtimes", &android.supported_runtimes),
        ("android.supported_images", &android.supported_images),
        ("android.architectures", &android.architectures),
    ] {
        if values.is_empty() {
            errors.push(ValidationError::new(
                "empty-list",
                format!("'{}' must list at least one entry", field),
            ));
        }
    }

    for runtime in &android.supported_runtimes {
        if parse_api_level(runtime).is_none() {
            errors.push(ValidationError::new(
                "invalid-android-runtime",
                format!("Android runtime '{}' is not of the form android-<N>", runtime),
            ));
        }
    }

    if !is_version(&config.ios.min_supported_runtime) {
        errors.push(ValidationError::new(
            "invalid-ios-version",
            format!(
                "'ios.min_supported_runtime' must look like 13.0, got '{}'",
                config.ios.min_supported_runtime
            ),
        ));
    }

    if config.checks.timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "zero-timeout",
            "'checks.timeout_secs' must be greater than zero",
        ));
    }

    errors
}

/// Validate and return a single error joining every message.
pub fn validate(config: &MobileConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(MobileError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

/// `major[.minor[.patch]]` with numeric parts.
fn is_version(text: &str) -> bool {
    let parts: Vec<_> = text.split('.').collect();
    parts.len() <= 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

/// API level of an `android-<N>` runtime name.
pub fn parse_api_level(runtime: &str) -> Option<u32> {
    runtime.strip_prefix("android-")?.parse().ok()
}
