//! Verify command implementation.
//!
//! The `lwc-mobile verify` command gates UI testing: the platform setup
//! group and the UI-test tooling group must both be met.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::args::VerifyArgs;
use crate::config::{load_config, validate};
use crate::error::{MobileError, Result};
use crate::platform::{system_env, EnvLookup, PlatformContext};
use crate::requirements::{NullReporter, RequirementProcessor, SetupReporter, TreeReporter};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::progress::SpinnerReporter;

/// The verify command implementation.
pub struct VerifyCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: VerifyArgs,
    runner: Arc<dyn CommandRunner>,
    env: EnvLookup,
    reporter: Option<Arc<dyn SetupReporter>>,
}

impl VerifyCommand {
    /// Create a new verify command that checks the real host.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: VerifyArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
            runner: Arc::new(SystemRunner::new().with_cwd(project_root)),
            env: system_env(),
            reporter: None,
        }
    }

    /// Run external commands through `runner`.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Read environment variables through `env`.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Present group results through `reporter` instead of the terminal tree.
    pub fn with_reporter(mut self, reporter: Arc<dyn SetupReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    fn reporter_for(&self, ui: &dyn UserInterface) -> Arc<dyn SetupReporter> {
        match &self.reporter {
            Some(reporter) => Arc::clone(reporter),
            None if !ui.output_mode().shows_status() => Arc::new(NullReporter),
            None => Arc::new(TreeReporter::for_terminal()),
        }
    }
}

#[async_trait]
impl Command for VerifyCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        validate(&config)?;

        let platform = self.args.platform;
        let check_timeout = config.checks.timeout();
        let context = PlatformContext::new(Arc::clone(&self.runner), config)
            .with_env(Arc::clone(&self.env))
            .with_api_level(self.args.api_level);
        let requirements = context.command_requirements(
            platform,
            self.args.skip_setup,
            self.args.skip_environment,
        );

        ui.show_header(&format!("Verifying {}", platform));
        let spinner = ui.start_spinner(&format!("Checking {} requirements", platform));
        let reporter = Arc::new(SpinnerReporter::new(Some(spinner), self.reporter_for(ui)));

        let processor = RequirementProcessor::new()
            .with_reporter(reporter.clone())
            .with_check_timeout(check_timeout);
        let outcome = processor.enforce(&requirements).await;
        reporter.finish();

        match outcome {
            Ok(()) => {
                ui.success(&format!("{} is ready for UI testing", platform));
                Ok(CommandResult::success())
            }
            Err(MobileError::RequirementsNotMet { group, actions }) => {
                ui.error(&format!("{} requirements not met for {}", group, platform));
                for action in &actions {
                    ui.show_hint(action);
                }
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{fixed_env, Platform};
    use crate::requirements::testing::RecordingReporter;
    use crate::shell::{CommandOutput, ScriptedRunner};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    const RUNTIMES: &str = r#"{"runtimes":[{"name":"iOS 17.2","version":"17.2","isAvailable":true}]}"#;
    const DRIVERS: &str = "- xcuitest@5.12.2 [installed (npm)]\n";

    fn ready_mac() -> ScriptedRunner {
        ScriptedRunner::new()
            .ok("/usr/bin/uname", "Darwin\n")
            .ok("xcodebuild -version", "Xcode 15.2\nBuild version 15C500b\n")
            .ok("xcrun simctl list runtimes --json", RUNTIMES)
            .ok("npx --no-install wdio --version", "8.27.0\n")
            .ok("appium --version", "2.4.1\n")
            .on(
                "appium driver list --installed",
                CommandOutput::success("", DRIVERS),
            )
    }

    fn args(skip_setup: bool, skip_environment: bool) -> VerifyArgs {
        VerifyArgs {
            platform: Platform::Ios,
            api_level: None,
            skip_setup,
            skip_environment,
        }
    }

    async fn run(
        runner: ScriptedRunner,
        args: VerifyArgs,
        reporter: Arc<RecordingReporter>,
    ) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        let cmd = VerifyCommand::new(temp.path(), None, args)
            .with_runner(Arc::new(runner))
            .with_env(fixed_env(&[]))
            .with_reporter(reporter);
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).await.unwrap();
        (result, ui)
    }

    #[tokio::test]
    async fn ready_host_passes_both_groups() {
        let reporter = Arc::new(RecordingReporter::default());
        let (result, ui) = run(ready_mac(), args(false, false), reporter.clone()).await;

        assert!(result.success);
        let mut headings = reporter.headings();
        headings.sort();
        assert_eq!(headings, vec!["environment", "setup"]);
        assert_eq!(ui.successes(), &["iOS is ready for UI testing"]);
    }

    #[tokio::test]
    async fn missing_tooling_reports_environment_group() {
        let runner = ready_mac().on(
            "appium --version",
            CommandOutput::failure(Some(127), "appium: command not found"),
        );
        let reporter = Arc::new(RecordingReporter::default());
        let (result, ui) = run(runner, args(false, false), reporter.clone()).await;

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.errors(), &["environment requirements not met for iOS"]);
        assert_eq!(ui.hints().len(), 1);
        assert!(ui.hints()[0].starts_with("Appium is not installed (appium: command not found)."));
        // Groups are presented as they finish; the unmet one comes last.
        assert_eq!(reporter.headings().last().map(String::as_str), Some("environment"));
    }

    #[tokio::test]
    async fn unmet_setup_group_is_reported_last() {
        let runner = ready_mac().on("/usr/bin/uname", CommandOutput::success("Linux\n", ""));
        let reporter = Arc::new(RecordingReporter::default());
        let (result, ui) = run(runner, args(false, false), reporter.clone()).await;

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.errors(), &["setup requirements not met for iOS"]);
        assert_eq!(reporter.headings().last().map(String::as_str), Some("setup"));
    }

    #[tokio::test]
    async fn skipped_setup_is_never_checked() {
        let runner = Arc::new(ready_mac());
        let temp = TempDir::new().unwrap();
        let cmd = VerifyCommand::new(temp.path(), None, args(true, false))
            .with_runner(runner.clone())
            .with_env(fixed_env(&[]))
            .with_reporter(Arc::new(NullReporter));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert!(result.success);
        assert_eq!(runner.call_count("/usr/bin/uname"), 0);
        assert_eq!(runner.call_count("xcodebuild -version"), 0);
        assert_eq!(runner.call_count("appium --version"), 1);
    }

    #[tokio::test]
    async fn skipping_everything_passes_without_checks() {
        let runner = Arc::new(ScriptedRunner::new());
        let temp = TempDir::new().unwrap();
        let cmd = VerifyCommand::new(temp.path(), None, args(true, true))
            .with_runner(runner.clone())
            .with_env(fixed_env(&[]));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert!(result.success);
        assert!(runner.calls().is_empty());
    }
}
