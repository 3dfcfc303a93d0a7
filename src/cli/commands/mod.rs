//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`lwc-mobile setup`, `lwc-mobile verify`)
//! - Shared config loading and platform wiring
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
mod progress;
pub mod setup;
pub mod verify;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
