//! lwc-mobile - Verify mobile emulator and simulator environments.
//!
//! lwc-mobile checks that a host can preview and UI-test components on
//! Android emulators and iOS simulators. Every check of a requirement list
//! runs concurrently, individual failures never abort the batch, and the
//! outcome is one pass/fail report with a diagnostic per check.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`platform`] - Android, iOS and UI-test tooling requirement lists
//! - [`requirements`] - The requirement engine: checks, runner, groups, reporting
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use lwc_mobile::requirements::{Requirement, RequirementRunner};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let java = Requirement::from_fn("Checking Java", "Java %s is available", "", |m| async move {
//!     Ok(m.fulfilled(&["17"]))
//! });
//! let result = RequirementRunner::new(vec![java]).evaluate().await;
//! assert!(result.has_met_all_requirements);
//! assert_eq!(result.tests[0].message, "Java 17 is available");
//! # });
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod requirements;
pub mod shell;
pub mod ui;

pub use error::{MobileError, Result};
