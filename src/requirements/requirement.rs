//! The requirement contract.
//!
//! A [`Requirement`] is a passive descriptor: a title, its message
//! templates, and the check that decides whether the condition holds.
//! Checks are small objects implementing [`RequirementCheck`]; closures can
//! be adapted with [`FnCheck`] or [`Requirement::from_fn`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::message::format_message;

/// Message templates owned by a requirement and handed to its check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementMessages {
    /// Template rendered when the condition holds.
    pub fulfilled: String,
    /// Template rendered when the condition does not hold.
    pub unfulfilled: String,
}

impl RequirementMessages {
    /// Render the fulfilled template with `%s` arguments.
    pub fn fulfilled(&self, args: &[&str]) -> String {
        format_message(&self.fulfilled, args)
    }

    /// Render the unfulfilled template with `%s` arguments.
    pub fn unfulfilled(&self, args: &[&str]) -> String {
        format_message(&self.unfulfilled, args)
    }
}

/// An independently verifiable environment condition.
///
/// Implementations resolve to a detail string when the condition holds and
/// fail with a reason otherwise. The reason's display text is what users see,
/// so implementations normally build it from
/// [`RequirementMessages::unfulfilled`].
#[async_trait]
pub trait RequirementCheck: Send + Sync {
    /// Run the check.
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String>;
}

/// Adapts a closure into a [`RequirementCheck`].
pub struct FnCheck<F>(pub F);

#[async_trait]
impl<F, Fut> RequirementCheck for FnCheck<F>
where
    F: Fn(RequirementMessages) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        (self.0)(messages.clone()).await
    }
}

/// A named, independently checkable condition.
#[derive(Clone)]
pub struct Requirement {
    /// Human-readable name of the condition.
    pub title: String,
    /// Templates used by the check to render its outcome.
    pub messages: RequirementMessages,
    /// Extra remediation text appended to the failure reason.
    pub supplemental_message: Option<String>,
    check: Arc<dyn RequirementCheck>,
}

impl Requirement {
    /// Create a requirement from a check object.
    pub fn new(
        title: impl Into<String>,
        fulfilled_message: impl Into<String>,
        unfulfilled_message: impl Into<String>,
        check: impl RequirementCheck + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            messages: RequirementMessages {
                fulfilled: fulfilled_message.into(),
                unfulfilled: unfulfilled_message.into(),
            },
            supplemental_message: None,
            check: Arc::new(check),
        }
    }

    /// Create a requirement whose check is a closure.
    pub fn from_fn<F, Fut>(
        title: impl Into<String>,
        fulfilled_message: impl Into<String>,
        unfulfilled_message: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: Fn(RequirementMessages) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self::new(title, fulfilled_message, unfulfilled_message, FnCheck(f))
    }

    /// Attach remediation text shown after the failure reason.
    pub fn with_supplemental_message(mut self, message: impl Into<String>) -> Self {
        self.supplemental_message = Some(message.into());
        self
    }

    /// Fulfilled message template.
    pub fn fulfilled_message(&self) -> &str {
        &self.messages.fulfilled
    }

    /// Unfulfilled message template.
    pub fn unfulfilled_message(&self) -> &str {
        &self.messages.unfulfilled
    }

    /// Shared handle to the check.
    pub(crate) fn check(&self) -> Arc<dyn RequirementCheck> {
        Arc::clone(&self.check)
    }

    /// Decorate a failure reason with the supplemental message, if any.
    pub(crate) fn failure_message(&self, reason: String) -> String {
        match &self.supplemental_message {
            Some(extra) if reason.is_empty() => extra.clone(),
            Some(extra) => format!("{} {}", reason, extra),
            None => reason,
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("title", &self.title)
            .field("messages", &self.messages)
            .field("supplemental_message", &self.supplemental_message)
            .finish_non_exhaustive()
    }
}
