//! Settling individual checks into uniform outcomes.
//!
//! A batch of heterogeneous checks can only be awaited together without one
//! failure aborting the rest if every check resolves to the same shape.
//! [`settle`] is that adapter: it never fails, and it treats a panicking
//! check exactly like one that returned an error.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

/// The settled result of a single requirement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The check resolved with this detail.
    Fulfilled(String),
    /// The check failed for this reason.
    Rejected(String),
}

impl CheckOutcome {
    /// Whether the check resolved successfully.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, CheckOutcome::Fulfilled(_))
    }

    /// The resolved detail or the rejection reason.
    pub fn detail(&self) -> &str {
        match self {
            CheckOutcome::Fulfilled(detail) | CheckOutcome::Rejected(detail) => detail,
        }
    }
}

/// Await a check and capture its outcome without propagating failure.
///
/// Errors become [`CheckOutcome::Rejected`] carrying the full error chain.
/// Panics raised while the future is polled are caught and rejected too, so
/// callers should construct the check inside the future (an `async` block)
/// to have panics during construction covered as well.
///
/// Catching a panic does not silence it: the process panic hook still runs
/// first, so the default hook prints `thread '...' panicked at ...` to stderr
/// before the check is rejected.
pub async fn settle<F>(future: F) -> CheckOutcome
where
    F: Future<Output = anyhow::Result<String>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(detail)) => CheckOutcome::Fulfilled(detail),
        Ok(Err(err)) => CheckOutcome::Rejected(format!("{:#}", err)),
        Err(payload) => CheckOutcome::Rejected(format!(
            "check panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

/// Like [`settle`], rejecting the check if it has not settled within `limit`.
pub async fn settle_within<F>(future: F, limit: Option<Duration>) -> CheckOutcome
where
    F: Future<Output = anyhow::Result<String>>,
{
    match limit {
        None => settle(future).await,
        Some(limit) => match tokio::time::timeout(limit, settle(future)).await {
            Ok(outcome) => outcome,
            Err(_) => CheckOutcome::Rejected(format!("timed out after {}s", limit.as_secs())),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
