//! External command execution.
//!
//! Requirement checks never spawn processes directly. They go through a
//! [`CommandRunner`], which is [`SystemRunner`] in the binary and a
//! [`ScriptedRunner`] in tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{MobileError, Result};

/// Result of running an external command to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }

    fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Stdout followed by stderr, trimmed.
    ///
    /// Some tools (`java -version`) print their banner on stderr.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }

    /// Non-empty trimmed lines of stdout.
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Runs external programs on behalf of requirement checks.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// A non-zero exit is an `Ok` output with `success == false`; an `Err`
    /// means the program could not be started at all.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs programs on the host with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every program in `cwd`, so project-local tools resolve.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let start = Instant::now();
        let cmdline = display_command(program, args);

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(command = %cmdline, "Running command");
        let output = cmd.output().await.map_err(|e| {
            tracing::debug!(command = %cmdline, error = %e, "Command could not be started");
            MobileError::CommandFailed {
                command: cmdline.clone(),
                code: None,
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let result = if output.status.success() {
            CommandOutput::success(stdout, stderr)
        } else {
            CommandOutput {
                stdout,
                ..CommandOutput::failure(output.status.code(), stderr)
            }
        };
        let result = result.with_duration(start.elapsed());
        tracing::debug!(
            command = %cmdline,
            code = ?result.exit_code,
            elapsed_ms = result.duration.as_millis() as u64,
            "Command finished"
        );
        Ok(result)
    }
}

/// Replays canned outputs keyed by the full command line.
///
/// Commands without a script fail to start, which is how a missing tool
/// looks on a real host.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `command` (program and args joined by spaces) to return `output`.
    pub fn on(mut self, command: &str, output: CommandOutput) -> Self {
        self.scripts.insert(command.to_string(), output);
        self
    }

    /// Script `command` to succeed with `stdout`.
    pub fn ok(self, command: &str, stdout: &str) -> Self {
        self.on(command, CommandOutput::success(stdout, ""))
    }

    /// Every command line run so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// How many times `command` was run.
    pub fn call_count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| *c == command).count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let cmdline = display_command(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(cmdline.clone());
        }
        self.scripts
            .get(&cmdline)
            .cloned()
            .ok_or(MobileError::CommandFailed {
                command: cmdline,
                code: None,
            })
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_stdout_and_stderr() {
        let output = CommandOutput::success("out\n", "  err\n");
        assert_eq!(output.combined(), "out\nerr");

        let only_err = CommandOutput::success("", "openjdk version \"17\"");
        assert_eq!(only_err.combined(), "openjdk version \"17\"");
    }

    #[test]
    fn stdout_lines_skips_blank_lines() {
        let output = CommandOutput::success("Xcode 15.0\n\nBuild version 15A240d\n", "");
        let lines: Vec<_> = output.stdout_lines().collect();
        assert_eq!(lines, vec!["Xcode 15.0", "Build version 15A240d"]);
    }

    #[test]
    fn failure_is_not_success() {
        let output = CommandOutput::failure(Some(2), "boom");
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(2));
    }

    #[tokio::test]
    async fn scripted_runner_replays_and_records() {
        let runner = ScriptedRunner::new().ok("java -version", "17");

        let output = runner.run("java", &["-version"]).await.unwrap();
        assert_eq!(output.stdout, "17");

        let missing = runner.run("appium", &["--version"]).await;
        assert!(matches!(missing, Err(MobileError::CommandFailed { .. })));

        assert_eq!(runner.calls(), vec!["java -version", "appium --version"]);
        assert_eq!(runner.call_count("java -version"), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_captures_output() {
        let output = SystemRunner::new()
            .run("sh", &["-c", "echo hello"])
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_reports_exit_code() {
        let output = SystemRunner::new()
            .run("sh", &["-c", "echo oops >&2; exit 3"])
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stderr.contains("oops"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_runs_in_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let output = SystemRunner::new()
            .with_cwd(temp.path())
            .run("ls", &[])
            .await
            .unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_logs_command_line() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let output = SystemRunner::new().run("echo", &["logged"]).await.unwrap();
        assert!(output.stdout.contains("logged"));

        let missing = SystemRunner::new().run("lwc-no-such-tool", &["--version"]).await;
        assert!(matches!(
            missing,
            Err(MobileError::CommandFailed { ref command, .. }) if command == "lwc-no-such-tool --version"
        ));
    }

    #[tokio::test]
    async fn system_runner_missing_program_is_command_failed() {
        let result = SystemRunner::new()
            .run("definitely-not-a-real-program-lwc", &[])
            .await;
        match result {
            Err(MobileError::CommandFailed { command, code }) => {
                assert_eq!(command, "definitely-not-a-real-program-lwc");
                assert_eq!(code, None);
            }
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
    }
}
