//! Concurrent evaluation of a requirement list.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::Instrument;

use super::outcome::{settle_within, CheckOutcome};
use super::report::{NullReporter, SetupReporter};
use super::{Requirement, SetupTestCase, SetupTestResult};

/// Default heading used when presenting results.
pub const DEFAULT_HEADING: &str = "Setup";

/// Runs every check of an ordered requirement list and aggregates the results.
///
/// All checks are dispatched at once on the calling task and awaited until
/// every one of them has settled, so a single failure never hides the others.
/// Results keep the declaration order of the list regardless of which check
/// finishes first. Nothing is cached: each evaluation re-runs every check.
pub struct RequirementRunner {
    heading: String,
    requirements: Vec<Requirement>,
    reporter: Arc<dyn SetupReporter>,
    check_timeout: Option<Duration>,
}

impl RequirementRunner {
    /// Create a runner over `requirements` that reports nothing.
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            requirements,
            reporter: Arc::new(NullReporter),
            check_timeout: None,
        }
    }

    /// Set the heading results are presented under.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Set the reporter that receives each evaluated result.
    pub fn with_reporter(mut self, reporter: Arc<dyn SetupReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Reject checks that have not settled within `limit`.
    pub fn with_check_timeout(mut self, limit: Option<Duration>) -> Self {
        self.check_timeout = limit;
        self
    }

    /// Append requirements after the existing ones.
    pub fn add_requirements(&mut self, requirements: impl IntoIterator<Item = Requirement>) {
        self.requirements.extend(requirements);
    }

    /// The requirement list, in declaration order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Heading used when presenting results.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Evaluate every requirement and present the result.
    ///
    /// Never fails: unmet requirements are reported through
    /// [`SetupTestResult::has_met_all_requirements`].
    pub async fn evaluate(&self) -> SetupTestResult {
        let result = self.run_checks().await;
        self.reporter.report(&self.heading, &result);
        result
    }

    /// Evaluate every requirement without presenting anything.
    pub async fn run_checks(&self) -> SetupTestResult {
        let started = Instant::now();
        tracing::debug!(
            heading = %self.heading,
            count = self.requirements.len(),
            "Dispatching requirement checks"
        );

        let tests = join_all(self.requirements.iter().map(|req| self.run_one(req))).await;
        let result = SetupTestResult::from_tests(tests, started.elapsed());

        tracing::info!(
            heading = %self.heading,
            met = result.has_met_all_requirements,
            failed = result.failed().count(),
            "Requirement checks settled"
        );
        result
    }

    async fn run_one(&self, req: &Requirement) -> SetupTestCase {
        let span = tracing::info_span!("requirement", title = %req.title);
        let check = req.check();
        let messages = &req.messages;
        let started = Instant::now();

        let outcome = settle_within(
            async move { check.check(messages).await },
            self.check_timeout,
        )
        .instrument(span.clone())
        .await;
        let duration = started.elapsed();

        let outcome = match outcome {
            CheckOutcome::Fulfilled(detail) => {
                span.in_scope(|| tracing::debug!(%detail, "Requirement fulfilled"));
                CheckOutcome::Fulfilled(detail)
            }
            CheckOutcome::Rejected(reason) => {
                span.in_scope(|| tracing::warn!(%reason, "Requirement not fulfilled"));
                CheckOutcome::Rejected(req.failure_message(reason))
            }
        };
        SetupTestCase::from_outcome(req.title.clone(), outcome, duration)
    }
}

impl std::fmt::Debug for RequirementRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementRunner")
            .field("heading", &self.heading)
            .field("requirements", &self.requirements)
            .field("check_timeout", &self.check_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::testing::{failing, pass, passing, reject, RecordingReporter};
    use crate::requirements::TestResult;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn all_passing_meets_requirements() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("SDK Check", "Done.", Duration::ZERO, &calls),
            passing("ANDROID_HOME check", "Done.", Duration::ZERO, &calls),
            passing("Java check", "Done.", Duration::ZERO, &calls),
        ]);

        let result = runner.evaluate().await;

        assert!(result.has_met_all_requirements);
        assert_eq!(result.tests.len(), runner.requirements().len());
        assert!(result.tests.iter().all(|t| t.has_passed));
    }

    #[tokio::test]
    async fn failures_are_counted_exactly() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("one", "Done.", Duration::ZERO, &calls),
            failing("two", "Failed.", Duration::ZERO, &calls),
            passing("three", "Done.", Duration::ZERO, &calls),
            failing("four", "Failed.", Duration::ZERO, &calls),
        ]);

        let result = runner.evaluate().await;

        assert!(!result.has_met_all_requirements);
        assert_eq!(result.tests.len(), 4);
        assert_eq!(result.failed().count(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn one_pass_one_reject_scenario() {
        let runner = RequirementRunner::new(vec![
            Requirement::from_fn("A", "", "", |_| async { pass("ok-A") }),
            Requirement::from_fn("B", "", "", |_| async { reject("bad-B") }),
        ]);

        let result = runner.evaluate().await;

        assert!(!result.has_met_all_requirements);
        assert_eq!(result.tests.len(), 2);
        assert_eq!(result.tests[0].test_result, TestResult::Passed);
        assert!(result.tests[0].has_passed);
        assert_eq!(result.tests[0].message, "ok-A");
        assert_eq!(result.tests[1].test_result, TestResult::Failed);
        assert!(!result.tests[1].has_passed);
        assert_eq!(result.tests[1].message, "bad-B");
    }

    #[tokio::test(start_paused = true)]
    async fn order_follows_declaration_not_completion() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("first", "1", Duration::from_millis(300), &calls),
            failing("second", "2", Duration::from_millis(200), &calls),
            passing("third", "3", Duration::from_millis(100), &calls),
            passing("fourth", "4", Duration::ZERO, &calls),
        ]);

        let result = runner.run_checks().await;

        let titles: Vec<_> = result.tests.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third", "fourth"]);
        let messages: Vec<_> = result.tests.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn checks_run_concurrently() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("a", "a", Duration::from_secs(1), &calls),
            passing("b", "b", Duration::from_secs(1), &calls),
            failing("c", "c", Duration::from_secs(1), &calls),
        ]);

        let started = Instant::now();
        let result = runner.run_checks().await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(result.tests.len(), 3);
    }

    #[tokio::test]
    async fn panicking_check_is_a_failed_test() {
        let runner = RequirementRunner::new(vec![
            Requirement::from_fn("sync throw", "", "", |_| -> std::future::Ready<anyhow::Result<String>> {
                panic!("thrown before any future existed")
            }),
            Requirement::from_fn("async reject", "", "", |_| async { reject("rejected") }),
            Requirement::from_fn("fine", "", "", |_| async { pass("ok") }),
        ]);

        let result = runner.evaluate().await;

        assert!(!result.has_met_all_requirements);
        assert_eq!(result.tests.len(), 3);
        assert!(!result.tests[0].has_passed);
        assert_eq!(
            result.tests[0].message,
            "check panicked: thrown before any future existed"
        );
        assert!(!result.tests[1].has_passed);
        assert!(result.tests[2].has_passed);
    }

    #[tokio::test]
    async fn repeated_evaluation_reruns_every_check() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("a", "a", Duration::ZERO, &calls),
            failing("b", "b", Duration::ZERO, &calls),
        ]);

        runner.evaluate().await;
        runner.evaluate().await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn supplemental_message_is_appended_on_failure() {
        let runner = RequirementRunner::new(vec![
            Requirement::from_fn("Checking SDK Platform Tools", "", "", |_| async {
                reject("Failed.")
            })
            .with_supplemental_message("Get Android platform tools!"),
            Requirement::from_fn("Checking SDK Tools", "", "", |_| async { reject("") }),
        ]);

        let result = runner.evaluate().await;

        assert_eq!(result.tests[0].message, "Failed. Get Android platform tools!");
        assert_eq!(result.tests[1].message, "");
        assert_eq!(result.tests[1].title, "Checking SDK Tools");
    }

    #[tokio::test]
    async fn evaluate_reports_once_under_heading() {
        let reporter = Arc::new(RecordingReporter::default());
        let runner = RequirementRunner::new(vec![Requirement::from_fn("A", "", "", |_| async {
            pass("ok")
        })])
        .with_heading("setup")
        .with_reporter(reporter.clone());

        runner.evaluate().await;

        assert_eq!(reporter.headings(), vec!["setup".to_string()]);
    }

    #[tokio::test]
    async fn run_checks_does_not_report() {
        let reporter = Arc::new(RecordingReporter::default());
        let runner = RequirementRunner::new(vec![Requirement::from_fn("A", "", "", |_| async {
            pass("ok")
        })])
        .with_reporter(reporter.clone());

        runner.run_checks().await;

        assert_eq!(reporter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_rejects_only_the_slow_check() {
        let calls = counter();
        let runner = RequirementRunner::new(vec![
            passing("hangs", "never", Duration::from_secs(3600), &calls),
            passing("quick", "ok", Duration::from_millis(5), &calls),
        ])
        .with_check_timeout(Some(Duration::from_secs(10)));

        let result = runner.run_checks().await;

        assert_eq!(result.tests[0].message, "timed out after 10s");
        assert!(!result.tests[0].has_passed);
        assert!(result.tests[1].has_passed);
    }

    #[tokio::test]
    async fn empty_list_meets_requirements() {
        let runner = RequirementRunner::new(Vec::new());
        let result = runner.evaluate().await;
        assert!(result.has_met_all_requirements);
        assert!(result.tests.is_empty());
    }

    #[test]
    fn add_requirements_appends_in_order() {
        let calls = counter();
        let mut runner =
            RequirementRunner::new(vec![passing("base", "b", Duration::ZERO, &calls)]);
        runner.add_requirements(vec![
            passing("x", "x", Duration::ZERO, &calls),
            passing("y", "y", Duration::ZERO, &calls),
        ]);
        let titles: Vec<_> = runner.requirements().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["base", "x", "y"]);
        assert_eq!(runner.heading(), DEFAULT_HEADING);
    }
}
