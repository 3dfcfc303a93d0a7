//! Setup command implementation.
//!
//! The `lwc-mobile setup` command checks that a platform's SDK and
//! simulator tooling is installed and reports every requirement.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::args::SetupArgs;
use crate::config::{load_config, validate};
use crate::error::{MobileError, Result};
use crate::platform::{system_env, EnvLookup, PlatformContext};
use crate::requirements::{NullReporter, RequirementRunner, SetupReporter, TreeReporter};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::progress::SpinnerReporter;

/// The setup command implementation.
pub struct SetupCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: SetupArgs,
    runner: Arc<dyn CommandRunner>,
    env: EnvLookup,
    reporter: Option<Arc<dyn SetupReporter>>,
}

impl SetupCommand {
    /// Create a new setup command that checks the real host.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: SetupArgs) -> Self {
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

    /// Present results through `reporter` instead of the terminal tree.
    pub fn with_reporter(mut self, reporter: Arc<dyn SetupReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &SetupArgs {
        &self.args
    }

    fn reporter_for(&self, ui: &dyn UserInterface) -> Arc<dyn SetupReporter> {
        match &self.reporter {
            Some(reporter) => Arc::clone(reporter),
            None if self.args.json || !ui.output_mode().shows_status() => Arc::new(NullReporter),
            None => Arc::new(TreeReporter::for_terminal()),
        }
    }
}

#[async_trait]
impl Command for SetupCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        validate(&config)?;

        let platform = self.args.platform;
        let check_timeout = config.checks.timeout();
        let context = PlatformContext::new(Arc::clone(&self.runner), config)
            .with_env(Arc::clone(&self.env))
            .with_api_level(self.args.api_level);

        let spinner = if self.args.json {
            None
        } else {
            ui.show_header(&format!("{} setup", platform));
            Some(ui.start_spinner(&format!("Checking {} requirements", platform)))
        };
        let reporter = Arc::new(SpinnerReporter::new(spinner, self.reporter_for(ui)));

        let runner = RequirementRunner::new(context.setup_requirements(platform))
            .with_heading(format!("{} setup", platform))
            .with_reporter(reporter.clone())
            .with_check_timeout(check_timeout);
        let result = runner.evaluate().await;
        reporter.finish();

        tracing::debug!(
            platform = %platform,
            passed = result.passed().count(),
            failed = result.failed().count(),
            "Setup evaluated"
        );

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&result).map_err(|e| MobileError::Other(e.into()))?;
            ui.message(&json);
        }

        if result.has_met_all_requirements {
            if !self.args.json {
                ui.success(&format!("{} setup requirements met", platform));
            }
            return Ok(CommandResult::success());
        }

        if !self.args.json {
            ui.error(&format!("{} setup requirements not met", platform));
            for action in result.unmet_messages() {
                ui.show_hint(&action);
            }
        }
        Ok(CommandResult::failure(1))
    }
}
