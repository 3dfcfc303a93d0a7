//! Spinner handoff for commands that report through a [`SetupReporter`].

use std::sync::{Arc, Mutex};

use crate::requirements::{SetupReporter, SetupTestResult};
use crate::ui::SpinnerHandle;

/// Clears the command's spinner before the first report is printed.
pub(crate) struct SpinnerReporter {
    spinner: Mutex<Option<Box<dyn SpinnerHandle>>>,
    inner: Arc<dyn SetupReporter>,
}

impl SpinnerReporter {
    pub(crate) fn new(spinner: Option<Box<dyn SpinnerHandle>>, inner: Arc<dyn SetupReporter>) -> Self {
        Self {
            spinner: Mutex::new(spinner),
            inner,
        }
    }

    /// Clear the spinner if it is still running.
    pub(crate) fn finish(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(mut spinner) = spinner.take() {
                spinner.clear();
            }
        }
    }
}

impl SetupReporter for SpinnerReporter {
    fn report(&self, heading: &str, result: &SetupTestResult) {
        self.finish();
        self.inner.report(heading, result);
    }
}
