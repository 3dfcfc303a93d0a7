//! Setup test result types.
//!
//! Each requirement check produces a [`SetupTestCase`]; a batch of them is
//! summarized by a [`SetupTestResult`].

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use super::outcome::CheckOutcome;

/// Pass/fail tag of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestResult {
    Passed,
    Failed,
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Passed => write!(f, "Passed"),
            TestResult::Failed => write!(f, "Failed"),
        }
    }
}

/// The result of checking a single requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupTestCase {
    /// Title of the requirement that was checked.
    pub title: String,
    pub test_result: TestResult,
    /// Resolved detail on success, rejection reason on failure.
    pub message: String,
    pub has_passed: bool,
    /// How long the check took to settle.
    #[serde(serialize_with = "as_secs")]
    pub duration: Duration,
}

impl SetupTestCase {
    /// Build a test case from a settled check.
    pub fn from_outcome(title: impl Into<String>, outcome: CheckOutcome, duration: Duration) -> Self {
        let (test_result, message) = match outcome {
            CheckOutcome::Fulfilled(detail) => (TestResult::Passed, detail),
            CheckOutcome::Rejected(reason) => (TestResult::Failed, reason),
        };
        Self {
            title: title.into(),
            test_result,
            message,
            has_passed: test_result == TestResult::Passed,
            duration,
        }
    }
}

/// Aggregate of every check in one evaluation, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupTestResult {
    pub has_met_all_requirements: bool,
    pub tests: Vec<SetupTestCase>,
    /// Wall-clock time of the whole batch.
    #[serde(serialize_with = "as_secs")]
    pub duration: Duration,
}

impl SetupTestResult {
    /// Aggregate test cases; the result is met only if every case passed.
    pub fn from_tests(tests: Vec<SetupTestCase>, duration: Duration) -> Self {
        Self {
            has_met_all_requirements: tests.iter().all(|t| t.has_passed),
            tests,
            duration,
        }
    }

    /// Test cases that failed, in declaration order.
    pub fn failed(&self) -> impl Iterator<Item = &SetupTestCase> {
        self.tests.iter().filter(|t| !t.has_passed)
    }

    /// Test cases that passed, in declaration order.
    pub fn passed(&self) -> impl Iterator<Item = &SetupTestCase> {
        self.tests.iter().filter(|t| t.has_passed)
    }

    /// Messages of failed test cases, suitable as remediation actions.
    pub fn unmet_messages(&self) -> Vec<String> {
        self.failed().map(|t| t.message.clone()).collect()
    }
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
