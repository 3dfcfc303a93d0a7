//! UI-test tooling requirements (WebdriverIO and Appium).

use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;

use crate::requirements::{Requirement, RequirementCheck, RequirementMessages};
use crate::shell::CommandRunner;

use super::Platform;

/// Appium driver that automates `platform`.
pub fn appium_driver(platform: Platform) -> &'static str {
    match platform {
        Platform::Android => "uiautomator2",
        Platform::Ios => "xcuitest",
    }
}

/// Runs a tool and passes with the first line of its output.
struct ToolVersionCheck {
    runner: Arc<dyn CommandRunner>,
    program: &'static str,
    args: &'static [&'static str],
}

#[async_trait]
impl RequirementCheck for ToolVersionCheck {
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let output = self
            .runner
            .run(self.program, self.args)
            .await
            .map_err(|e| anyhow!(messages.unfulfilled(&[&e.to_string()])))?;
        if !output.success {
            bail!(messages.unfulfilled(&[&output.combined()]));
        }
        let version = output.stdout_lines().next().unwrap_or("unknown version");
        Ok(messages.fulfilled(&[version]))
    }
}

/// Looks for a driver in `appium driver list --installed`.
struct AppiumDriverCheck {
    runner: Arc<dyn CommandRunner>,
    driver: &'static str,
}

#[async_trait]
impl RequirementCheck for AppiumDriverCheck {
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let output = self
            .runner
            .run("appium", &["driver", "list", "--installed"])
            .await
            .map_err(|_| anyhow!(messages.unfulfilled(&[self.driver, self.driver])))?;
        // Appium prints its driver list on stderr.
        let listing = output.combined();
        let installed = output.success
            && listing
                .lines()
                .any(|line| line.split_whitespace().any(|word| driver_name(word) == self.driver));
        if installed {
            Ok(messages.fulfilled(&[self.driver]))
        } else {
            bail!(messages.unfulfilled(&[self.driver, self.driver]))
        }
    }
}

/// `uiautomator2` from `uiautomator2@2.29.1`.
fn driver_name(word: &str) -> &str {
    word.split('@').next().unwrap_or(word)
}

/// The `environment` requirements for `platform`, in presentation order.
pub fn requirements(runner: Arc<dyn CommandRunner>, platform: Platform) -> Vec<Requirement> {
    vec![
        Requirement::new(
            "Checking WebdriverIO",
            "WebdriverIO %s is available",
            "WebdriverIO is not installed in this project (%s).",
            ToolVersionCheck {
                runner: Arc::clone(&runner),
                program: "npx",
                args: &["--no-install", "wdio", "--version"],
            },
        )
        .with_supplemental_message("Install it with: npm install --save-dev @wdio/cli"),
        Requirement::new(
            "Checking Appium",
            "Appium %s is available",
            "Appium is not installed (%s).",
            ToolVersionCheck {
                runner: Arc::clone(&runner),
                program: "appium",
                args: &["--version"],
            },
        )
        .with_supplemental_message("Install it with: npm install -g appium"),
        Requirement::new(
            format!("Checking Appium {} driver", platform),
            "Appium driver %s is installed",
            "Appium driver %s is not installed. Install it with: appium driver install %s",
            AppiumDriverCheck {
                runner,
                driver: appium_driver(platform),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::RequirementRunner;
    use crate::shell::{CommandOutput, ScriptedRunner};

    const DRIVERS: &str = "- Listing installed drivers\n✔ Listing installed drivers\n- uiautomator2@2.29.1 [installed (npm)]\n";

    fn tooling() -> ScriptedRunner {
        ScriptedRunner::new()
            .ok("npx --no-install wdio --version", "8.27.0\n")
            .ok("appium --version", "2.4.1\n")
            .on(
                "appium driver list --installed",
                CommandOutput::success("", DRIVERS),
            )
    }

    #[test]
    fn drivers_per_platform() {
        assert_eq!(appium_driver(Platform::Android), "uiautomator2");
        assert_eq!(appium_driver(Platform::Ios), "xcuitest");
    }

    #[tokio::test]
    async fn android_tooling_passes() {
        let reqs = requirements(Arc::new(tooling()), Platform::Android);
        let result = RequirementRunner::new(reqs).evaluate().await;

        assert!(result.has_met_all_requirements, "{:?}", result.unmet_messages());
        assert_eq!(result.tests[0].message, "WebdriverIO 8.27.0 is available");
        assert_eq!(result.tests[1].message, "Appium 2.4.1 is available");
        assert_eq!(result.tests[2].message, "Appium driver uiautomator2 is installed");
        assert_eq!(result.tests[2].title, "Checking Appium Android driver");
    }

    #[tokio::test]
    async fn ios_needs_xcuitest() {
        let reqs = requirements(Arc::new(tooling()), Platform::Ios);
        let result = RequirementRunner::new(reqs).evaluate().await;

        assert!(!result.has_met_all_requirements);
        assert_eq!(
            result.unmet_messages(),
            vec![
                "Appium driver xcuitest is not installed. Install it with: appium driver install xcuitest"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn missing_appium_gets_install_hint() {
        let runner = ScriptedRunner::new().ok("npx --no-install wdio --version", "8.27.0\n");
        let result = RequirementRunner::new(requirements(Arc::new(runner), Platform::Android))
            .evaluate()
            .await;

        assert!(result.tests[0].has_passed);
        assert!(result.tests[1].message.starts_with("Appium is not installed ("));
        assert!(result.tests[1]
            .message
            .ends_with("Install it with: npm install -g appium"));
        assert!(!result.tests[2].has_passed);
    }

    #[tokio::test]
    async fn wdio_missing_from_project() {
        let runner = tooling().on(
            "npx --no-install wdio --version",
            CommandOutput::failure(Some(1), "npm ERR! canceled"),
        );
        let result = RequirementRunner::new(requirements(Arc::new(runner), Platform::Android))
            .evaluate()
            .await;

        assert_eq!(
            result.tests[0].message,
            "WebdriverIO is not installed in this project (npm ERR! canceled). Install it with: npm install --save-dev @wdio/cli"
        );
    }
}
