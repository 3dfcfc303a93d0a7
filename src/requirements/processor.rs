//! Gating a command on named groups of requirements.
//!
//! Where [`RequirementRunner::evaluate`] reports, [`RequirementProcessor::enforce`]
//! gates: it succeeds only if every enabled group fully passes, and fails
//! with the messages of the first group that comes back unmet otherwise.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::{MobileError, Result};

use super::report::{NullReporter, SetupReporter};
use super::{Requirement, RequirementRunner, SetupTestResult};

/// Group name for the base platform requirements.
pub const SETUP_GROUP: &str = "setup";
/// Group name for tool-specific requirements.
pub const ENVIRONMENT_GROUP: &str = "environment";

/// A named set of requirements that can be switched off as a whole.
#[derive(Debug, Clone)]
pub struct RequirementGroup {
    pub requirements: Vec<Requirement>,
    pub enabled: bool,
}

impl RequirementGroup {
    /// An enabled group.
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self {
            requirements,
            enabled: true,
        }
    }

    /// Enable or disable the group.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Named requirement groups of one command, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CommandRequirements {
    groups: Vec<(String, RequirementGroup)>,
}

impl CommandRequirements {
    /// Create an empty set of groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a group. A replaced group keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, group: RequirementGroup) {
        let name = name.into();
        match self.groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = group,
            None => self.groups.push((name, group)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_group(mut self, name: impl Into<String>, group: RequirementGroup) -> Self {
        self.insert(name, group);
        self
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&RequirementGroup> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    /// Groups that will be dispatched.
    pub fn enabled_groups(&self) -> impl Iterator<Item = (&str, &RequirementGroup)> {
        self.groups
            .iter()
            .filter(|(_, g)| g.enabled)
            .map(|(n, g)| (n.as_str(), g))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Enforces command requirements group by group.
pub struct RequirementProcessor {
    reporter: Arc<dyn SetupReporter>,
    check_timeout: Option<Duration>,
}

impl Default for RequirementProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementProcessor {
    /// Create a processor that reports nothing.
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(NullReporter),
            check_timeout: None,
        }
    }

    /// Set the reporter that presents each judged group.
    pub fn with_reporter(mut self, reporter: Arc<dyn SetupReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Reject checks that have not settled within `limit`.
    pub fn with_check_timeout(mut self, limit: Option<Duration>) -> Self {
        self.check_timeout = limit;
        self
    }

    /// Run every enabled group and fail as soon as one is unmet.
    ///
    /// Enabled groups run concurrently as separate tasks; disabled groups
    /// dispatch nothing. Each group is presented and judged the moment all
    /// of its checks have settled, so the first group to come back unmet
    /// raises without waiting for the others. Its failed messages become
    /// the error's actions. Groups still running at that point are neither
    /// cancelled nor presented.
    pub async fn enforce(&self, requirements: &CommandRequirements) -> Result<()> {
        let mut pending: FuturesUnordered<_> = requirements
            .enabled_groups()
            .map(|(name, group)| {
                let name = name.to_string();
                let runner = RequirementRunner::new(group.requirements.clone())
                    .with_heading(name.clone())
                    .with_check_timeout(self.check_timeout);
                tokio::spawn(async move {
                    let result = runner.run_checks().await;
                    (name, result)
                })
            })
            .collect();

        while let Some(joined) = pending.next().await {
            let (name, result): (String, SetupTestResult) = joined.map_err(|e| {
                MobileError::Other(anyhow::anyhow!("requirement group task failed: {}", e))
            })?;
            self.reporter.report(&name, &result);
            if !result.has_met_all_requirements {
                tracing::warn!(group = %name, "Requirement group not met");
                return Err(MobileError::RequirementsNotMet {
                    group: name,
                    actions: result.unmet_messages(),
                });
            }
            tracing::debug!(group = %name, "Requirement group met");
        }
        Ok(())
    }
}
