//! Requirement verification.
//!
//! A [`Requirement`] pairs a human-readable title with an asynchronous check.
//! [`RequirementRunner`] settles every check of a list concurrently and
//! aggregates them into a [`SetupTestResult`]; [`RequirementProcessor`]
//! gates a command on named [`RequirementGroup`]s.
//!
//! # Modules
//!
//! - [`requirement`] - Requirement and check definitions
//! - [`message`] - `%s` message templates
//! - [`outcome`] - Settling checks, including panics and timeouts
//! - [`status`] - Test case and aggregate result types
//! - [`runner`] - Concurrent evaluation of a requirement list
//! - [`processor`] - Grouped enforcement for commands
//! - [`report`] - Presentation of results

pub mod message;
pub mod outcome;
pub mod processor;
pub mod report;
pub mod requirement;
pub mod runner;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use message::format_message;
pub use outcome::{settle, settle_within, CheckOutcome};
pub use processor::{
    CommandRequirements, RequirementGroup, RequirementProcessor, ENVIRONMENT_GROUP, SETUP_GROUP,
};
pub use report::{render_tree, NullReporter, SetupReporter, TreeReporter};
pub use requirement::{FnCheck, Requirement, RequirementCheck, RequirementMessages};
pub use runner::{RequirementRunner, DEFAULT_HEADING};
pub use status::{SetupTestCase, SetupTestResult, TestResult};
