//! Concrete requirement lists for each mobile platform.
//!
//! Every check reaches the host through the [`CommandRunner`] and
//! [`EnvLookup`] held by a [`PlatformContext`], so tests swap in scripted
//! fakes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lwc_mobile::config::MobileConfig;
//! use lwc_mobile::platform::{Platform, PlatformContext};
//! use lwc_mobile::shell::ScriptedRunner;
//!
//! let ctx = PlatformContext::new(Arc::new(ScriptedRunner::new()), MobileConfig::default());
//! let titles: Vec<_> = ctx
//!     .setup_requirements(Platform::Ios)
//!     .into_iter()
//!     .map(|r| r.title)
//!     .collect();
//! assert_eq!(titles.len(), 3);
//! ```

pub mod android;
pub mod environment;
pub mod ios;

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::MobileConfig;
use crate::requirements::{
    CommandRequirements, Requirement, RequirementGroup, ENVIRONMENT_GROUP, SETUP_GROUP,
};
use crate::shell::CommandRunner;

pub use android::{AndroidPackage, AndroidPackages, AndroidSdk};
pub use environment::appium_driver;
pub use ios::{IosRuntime, IosVersion};

/// A mobile platform the tool can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
        }
    }
}

/// Reads an environment variable.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment. Empty values count as unset.
pub fn system_env() -> EnvLookup {
    Arc::new(|key: &str| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

/// Everything a platform's checks need from the host and the project.
#[derive(Clone)]
pub struct PlatformContext {
    runner: Arc<dyn CommandRunner>,
    env: EnvLookup,
    config: MobileConfig,
    api_level: Option<u32>,
}

impl PlatformContext {
    /// Create a context reading the process environment.
    pub fn new(runner: Arc<dyn CommandRunner>, config: MobileConfig) -> Self {
        Self {
            runner,
            env: system_env(),
            config,
            api_level: None,
        }
    }

    /// Replace the environment lookup.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Require exactly this Android API level instead of any supported one.
    pub fn with_api_level(mut self, api_level: Option<u32>) -> Self {
        self.api_level = api_level;
        self
    }

    /// Base requirements for developing on `platform`.
    pub fn setup_requirements(&self, platform: Platform) -> Vec<Requirement> {
        match platform {
            Platform::Android => {
                let sdk = AndroidSdk::new(
                    Arc::clone(&self.runner),
                    Arc::clone(&self.env),
                    self.config.android.clone(),
                )
                .with_api_level(self.api_level);
                android::requirements(Arc::new(sdk))
            }
            Platform::Ios => ios::requirements(Arc::clone(&self.runner), &self.config.ios),
        }
    }

    /// UI-test tooling requirements for `platform`.
    pub fn environment_requirements(&self, platform: Platform) -> Vec<Requirement> {
        environment::requirements(Arc::clone(&self.runner), platform)
    }

    /// The `setup` and `environment` groups of a gated command.
    pub fn command_requirements(
        &self,
        platform: Platform,
        skip_setup: bool,
        skip_environment: bool,
    ) -> CommandRequirements {
        CommandRequirements::new()
            .with_group(
                SETUP_GROUP,
                RequirementGroup::new(self.setup_requirements(platform)).enabled(!skip_setup),
            )
            .with_group(
                ENVIRONMENT_GROUP,
                RequirementGroup::new(self.environment_requirements(platform))
                    .enabled(!skip_environment),
            )
    }
}

impl fmt::Debug for PlatformContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformContext")
            .field("config", &self.config)
            .field("api_level", &self.api_level)
            .finish_non_exhaustive()
    }
}

/// Environment lookup over fixed pairs, for tests.
#[cfg(test)]
pub(crate) fn fixed_env(pairs: &[(&str, &str)]) -> EnvLookup {
    let vars: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(move |key: &str| vars.get(key).cloned())
}
