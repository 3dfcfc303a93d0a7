//! iOS simulator requirements.

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::IosConfig;
use crate::requirements::{Requirement, RequirementCheck, RequirementMessages};
use crate::shell::CommandRunner;

/// A dotted iOS version, compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IosVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl IosVersion {
    /// Parse `major[.minor[.patch]]`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major: u32 = parts.next()?.parse().ok()?;
        let minor: u32 = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
        let patch: u32 = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for IosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch > 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

/// A simulator runtime from `xcrun simctl list runtimes --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosRuntime {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
struct RuntimeList {
    runtimes: Vec<IosRuntime>,
}

/// Available iOS runtimes at or above `min`, in listed order.
pub fn supported_runtimes(json: &str, min: IosVersion) -> anyhow::Result<Vec<IosRuntime>> {
    let list: RuntimeList =
        serde_json::from_str(json).context("unexpected simctl runtime listing")?;
    Ok(list
        .runtimes
        .into_iter()
        .filter(|r| r.is_available && r.name.starts_with("iOS"))
        .filter(|r| IosVersion::parse(&r.version).is_some_and(|v| v >= min))
        .collect())
}

#[derive(Debug, Clone, Copy)]
enum IosCheckKind {
    MacHost,
    Xcode,
    SimulatorRuntime,
}

struct IosCheck {
    runner: Arc<dyn CommandRunner>,
    min_runtime: String,
    kind: IosCheckKind,
}

impl IosCheck {
    async fn list_runtimes(&self, min: IosVersion) -> anyhow::Result<Vec<IosRuntime>> {
        let output = self
            .runner
            .run("xcrun", &["simctl", "list", "runtimes", "--json"])
            .await?;
        if !output.success {
            bail!("simctl failed: {}", output.combined());
        }
        supported_runtimes(&output.stdout, min)
    }

    async fn mac_host(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let output = self
            .runner
            .run("/usr/bin/uname", &[])
            .await
            .map_err(|e| anyhow!(messages.unfulfilled(&[&e.to_string()])))?;
        let host = output.stdout.trim();
        if host == "Darwin" {
            Ok(messages.fulfilled(&[]))
        } else {
            bail!(messages.unfulfilled(&[host]))
        }
    }

    async fn xcode(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let output = self
            .runner
            .run("xcodebuild", &["-version"])
            .await
            .map_err(|e| anyhow!(messages.unfulfilled(&[&e.to_string()])))?;
        let details = output.stdout_lines().collect::<Vec<_>>().join(" ");
        if output.success && !details.is_empty() {
            Ok(messages.fulfilled(&[&details]))
        } else {
            let stderr = output.stderr.trim();
            bail!(messages.unfulfilled(&[if stderr.is_empty() { "None" } else { stderr }]))
        }
    }

    async fn simulator_runtime(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let wanted = format!("iOS-{}", self.min_runtime);
        let min = IosVersion::parse(&self.min_runtime)
            .ok_or_else(|| anyhow!(messages.unfulfilled(&[&wanted])))?;

        let found = self.list_runtimes(min).await;

        match found {
            Ok(runtimes) if !runtimes.is_empty() => {
                let names: Vec<_> = runtimes.iter().map(|r| r.name.as_str()).collect();
                Ok(messages.fulfilled(&[&names.join(", ")]))
            }
            Ok(_) => bail!(messages.unfulfilled(&[&wanted])),
            Err(e) => {
                tracing::debug!(error = %format!("{:#}", e), "Simulator runtime lookup failed");
                bail!(messages.unfulfilled(&[&wanted]))
            }
        }
    }
}

#[async_trait]
impl RequirementCheck for IosCheck {
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        match self.kind {
            IosCheckKind::MacHost => self.mac_host(messages).await,
            IosCheckKind::Xcode => self.xcode(messages).await,
            IosCheckKind::SimulatorRuntime => self.simulator_runtime(messages).await,
        }
    }
}

/// The iOS `setup` requirements, in presentation order.
pub fn requirements(runner: Arc<dyn CommandRunner>, config: &IosConfig) -> Vec<Requirement> {
    let check = |kind| IosCheck {
        runner: Arc::clone(&runner),
        min_runtime: config.min_supported_runtime.clone(),
        kind,
    };
    vec![
        Requirement::new(
            "Checking macOS",
            "Running on macOS",
            "iOS development requires macOS. This host reports: %s",
            check(IosCheckKind::MacHost),
        ),
        Requirement::new(
            "Checking Xcode",
            "Xcode installed: %s",
            "Xcode is not installed: %s",
            check(IosCheckKind::Xcode),
        ),
        Requirement::new(
            "Checking iOS simulator runtimes",
            "Supported iOS simulator runtimes: %s",
            "Install an iOS simulator runtime of %s or later with Xcode.",
            check(IosCheckKind::SimulatorRuntime),
        ),
    ]
}
