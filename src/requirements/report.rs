//! Presentation of setup results.
//!
//! Reporting is a pluggable hook: the runner hands every completed
//! [`SetupTestResult`] to a [`SetupReporter`] and never depends on what it
//! does with it.

use std::io::Write;
use std::time::Duration;

use console::Term;

use crate::ui::{should_use_colors, Theme};

use super::SetupTestResult;

/// Receives completed results for presentation.
pub trait SetupReporter: Send + Sync {
    /// Present `result` under `heading` (e.g. "Setup").
    fn report(&self, heading: &str, result: &SetupTestResult);
}

/// Reporter that presents nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl SetupReporter for NullReporter {
    fn report(&self, _heading: &str, _result: &SetupTestResult) {}
}

/// Renders results as a tree on stdout.
///
/// ```text
/// Setup (1.20 sec)
/// ├── Passed (0.01 sec): ANDROID_HOME is set to /opt/android-sdk
/// └── Failed (1.19 sec): Java 8 or later is required.
/// ```
#[derive(Debug, Clone)]
pub struct TreeReporter {
    theme: Theme,
}

impl TreeReporter {
    /// Create a reporter with an explicit theme.
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Create a reporter styled for the current terminal.
    pub fn for_terminal() -> Self {
        if should_use_colors() {
            Self::new(Theme::new())
        } else {
            Self::new(Theme::plain())
        }
    }
}

impl SetupReporter for TreeReporter {
    fn report(&self, heading: &str, result: &SetupTestResult) {
        let mut term = Term::stdout();
        for line in render_tree(heading, result, &self.theme) {
            writeln!(term, "{}", line).ok();
        }
    }
}

/// Render a result as tree lines, root first.
pub fn render_tree(heading: &str, result: &SetupTestResult, theme: &Theme) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.tests.len() + 1);
    lines.push(format!(
        "{} {}",
        theme.highlight.apply_to(heading),
        theme.duration.apply_to(format!("({} sec)", format_secs(result.duration)))
    ));

    let last = result.tests.len().saturating_sub(1);
    for (idx, test) in result.tests.iter().enumerate() {
        let branch = if idx == last { "└──" } else { "├──" };
        let text = format!(
            "{} ({} sec): {}",
            test.test_result,
            format_secs(test.duration),
            test.message
        );
        let style = if test.has_passed {
            &theme.passed
        } else {
            &theme.failed
        };
        lines.push(format!(
            "{} {}",
            theme.border.apply_to(branch),
            style.apply_to(text)
        ));
    }
    lines
}

fn format_secs(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{CheckOutcome, SetupTestCase};

    fn result() -> SetupTestResult {
        SetupTestResult::from_tests(
            vec![
                SetupTestCase::from_outcome(
                    "A",
                    CheckOutcome::Fulfilled("ok-A".into()),
                    Duration::from_millis(10),
                ),
                SetupTestCase::from_outcome(
                    "B",
                    CheckOutcome::Rejected("bad-B".into()),
                    Duration::from_millis(1190),
                ),
            ],
            Duration::from_millis(1200),
        )
    }

    #[test]
    fn renders_heading_with_total_duration() {
        let lines = render_tree("Setup", &result(), &Theme::plain());
        assert_eq!(lines[0], "Setup (1.20 sec)");
    }

    #[test]
    fn renders_one_branch_per_test_in_order() {
        let lines = render_tree("Setup", &result(), &Theme::plain());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "├── Passed (0.01 sec): ok-A");
        assert_eq!(lines[2], "└── Failed (1.19 sec): bad-B");
    }

    #[test]
    fn renders_heading_only_for_empty_result() {
        let empty = SetupTestResult::from_tests(Vec::new(), Duration::ZERO);
        let lines = render_tree("environment", &empty, &Theme::plain());
        assert_eq!(lines, vec!["environment (0.00 sec)".to_string()]);
    }

    #[test]
    fn null_reporter_accepts_results() {
        NullReporter.report("Setup", &result());
    }
}
