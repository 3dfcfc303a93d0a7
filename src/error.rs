//! Error types for lwc-mobile operations.
//!
//! This module defines [`MobileError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Individual requirement check failures are data, not errors: they are
//!   captured in a [`SetupTestResult`](crate::requirements::SetupTestResult)
//! - Use `MobileError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `MobileError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lwc-mobile operations.
#[derive(Debug, Error)]
pub enum MobileError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be started or exited abnormally.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An enabled requirement group did not meet all of its requirements.
    ///
    /// `actions` holds the message of every failed check in the group, in
    /// declaration order, so callers can present them as remediation steps.
    #[error("{group} requirements not met:\n{}", format_actions(.actions))]
    RequirementsNotMet { group: String, actions: Vec<String> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MobileError {
    /// Remediation actions attached to this error, if any.
    pub fn actions(&self) -> &[String] {
        match self {
            MobileError::RequirementsNotMet { actions, .. } => actions,
            _ => &[],
        }
    }
}

fn format_actions(actions: &[String]) -> String {
    actions
        .iter()
        .map(|a| format!("  - {}", a))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for lwc-mobile operations.
pub type Result<T> = std::result::Result<T, MobileError>;
