//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::platform::Platform;

/// lwc-mobile - Verify mobile emulator and simulator environments.
#[derive(Debug, Parser)]
#[command(name = "lwc-mobile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .lwc-mobile/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the platform's SDK and simulator tooling is installed
    Setup(SetupArgs),

    /// Check setup and UI-test tooling, failing on the first unmet group
    Verify(VerifyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SetupArgs {
    /// Platform to check
    #[arg(long, value_enum)]
    pub platform: Platform,

    /// Require this Android API level instead of any supported one
    #[arg(long)]
    pub api_level: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `verify` command.
#[derive(Debug, Clone, clap::Args)]
pub struct VerifyArgs {
    /// Platform to check
    #[arg(long, value_enum)]
    pub platform: Platform,

    /// Require this Android API level instead of any supported one
    #[arg(long)]
    pub api_level: Option<u32>,

    /// Skip the platform setup requirements
    #[arg(long)]
    pub skip_setup: bool,

    /// Skip the UI-test tooling requirements
    #[arg(long)]
    pub skip_environment: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_setup_with_platform() {
        let cli = Cli::try_parse_from(["lwc-mobile", "setup", "--platform", "android"]).unwrap();
        match cli.command {
            Some(Commands::Setup(args)) => {
                assert_eq!(args.platform, Platform::Android);
                assert_eq!(args.api_level, None);
                assert!(!args.json);
            }
            other => panic!("expected setup, got {:?}", other),
        }
    }

    #[test]
    fn parses_setup_api_level_and_json() {
        let cli = Cli::try_parse_from([
            "lwc-mobile",
            "setup",
            "--platform",
            "android",
            "--api-level",
            "28",
            "--json",
        ])
        .unwrap();
        let Some(Commands::Setup(args)) = cli.command else {
            panic!("expected setup");
        };
        assert_eq!(args.api_level, Some(28));
        assert!(args.json);
    }

    #[test]
    fn parses_verify_skips() {
        let cli = Cli::try_parse_from([
            "lwc-mobile",
            "verify",
            "--platform",
            "ios",
            "--skip-environment",
        ])
        .unwrap();
        let Some(Commands::Verify(args)) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.platform, Platform::Ios);
        assert!(!args.skip_setup);
        assert!(args.skip_environment);
    }

    #[test]
    fn rejects_unknown_platform() {
        let result = Cli::try_parse_from(["lwc-mobile", "setup", "--platform", "windows"]);
        assert!(result.is_err());
    }

    #[test]
    fn platform_is_required() {
        assert!(Cli::try_parse_from(["lwc-mobile", "setup"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lwc-mobile",
            "setup",
            "--platform",
            "ios",
            "--quiet",
            "--config",
            "custom.yml",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yml")));
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["lwc-mobile"]).unwrap();
        assert!(cli.command.is_none());
    }
}
