//! Shell completions generation.
//!
//! The `lwc-mobile completions` command generates shell completion scripts.

use async_trait::async_trait;
use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

const BIN_NAME: &str = "lwc-mobile";

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Write the completion script to `out`.
    pub fn generate(&self, out: &mut dyn std::io::Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, BIN_NAME, out);
    }
}

#[async_trait]
impl Command for CompletionsCommand {
    async fn execute(&self, _ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        self.generate(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}
