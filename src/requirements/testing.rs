//! Shared fakes for requirement tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::report::SetupReporter;
use super::{Requirement, SetupTestResult};

pub(crate) fn pass(detail: impl Into<String>) -> anyhow::Result<String> {
    Ok(detail.into())
}

pub(crate) fn reject(reason: impl Into<String>) -> anyhow::Result<String> {
    Err(anyhow::anyhow!(reason.into()))
}

/// A requirement that resolves to `detail` after `delay`, counting calls.
pub(crate) fn passing(title: &str, detail: &str, delay: Duration, calls: &Arc<AtomicUsize>) -> Requirement {
    let detail = detail.to_string();
    let calls = Arc::clone(calls);
    Requirement::from_fn(title, "", "", move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        let detail = detail.clone();
        async move {
            tokio::time::sleep(delay).await;
            pass(detail)
        }
    })
}

/// A requirement that rejects with `reason` after `delay`, counting calls.
pub(crate) fn failing(title: &str, reason: &str, delay: Duration, calls: &Arc<AtomicUsize>) -> Requirement {
    let reason = reason.to_string();
    let calls = Arc::clone(calls);
    Requirement::from_fn(title, "", "", move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        let reason = reason.clone();
        async move {
            tokio::time::sleep(delay).await;
            reject(reason)
        }
    })
}

/// Reporter that remembers what it was asked to present.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    reports: Mutex<Vec<(String, SetupTestResult)>>,
}

impl RecordingReporter {
    pub(crate) fn headings(&self) -> Vec<String> {
        self.reports
            .lock()
            .map(|r| r.iter().map(|(h, _)| h.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl SetupReporter for RecordingReporter {
    fn report(&self, heading: &str, result: &SetupTestResult) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((heading.to_string(), result.clone()));
        }
    }
}
