//! External command execution and host detection.

pub mod command;
pub mod platform;

pub use command::{CommandOutput, CommandRunner, ScriptedRunner, SystemRunner};
pub use platform::is_ci;
