//! Android SDK requirements.
//!
//! The SDK is located through `ANDROID_HOME`, falling back to
//! `ANDROID_SDK_ROOT`. Package checks share one `sdkmanager --list_installed`
//! run per [`AndroidSdk`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use regex::Regex;
use tokio::sync::OnceCell;

use crate::config::{parse_api_level, AndroidConfig};
use crate::requirements::{Requirement, RequirementCheck, RequirementMessages};
use crate::shell::CommandRunner;

use super::EnvLookup;

/// Environment variables naming the SDK root, in lookup order.
pub const SDK_ROOT_VARS: [&str; 2] = ["ANDROID_HOME", "ANDROID_SDK_ROOT"];

static JAVA_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"version "(\d+)(?:\.(\d+))?"#).expect("JAVA_VERSION must compile")
});

/// One row of `sdkmanager --list_installed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidPackage {
    /// Package path without its category, e.g. `android-29;default;x86_64`.
    pub path: String,
    pub api_level: u32,
    pub description: String,
    pub location: String,
}

impl AndroidPackage {
    /// Platform component, e.g. `android-29`.
    pub fn platform_api(&self) -> &str {
        self.path.split(';').next().unwrap_or_default()
    }

    /// Image flavor of a system image, e.g. `google_apis`.
    pub fn emulator_image(&self) -> &str {
        self.path.split(';').nth(1).unwrap_or_default()
    }

    /// ABI of a system image, e.g. `x86_64`.
    pub fn abi(&self) -> &str {
        self.path.split(';').nth(2).unwrap_or_default()
    }
}

/// Installed platform and system-image packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndroidPackages {
    pub platforms: Vec<AndroidPackage>,
    pub system_images: Vec<AndroidPackage>,
}

impl AndroidPackages {
    /// Parse the "Installed packages" table of `sdkmanager --list_installed`.
    ///
    /// Rows other than `platforms;android-*` and `system-images;android-*`
    /// are ignored, as is everything after "Available Packages".
    pub fn parse(raw: &str) -> Self {
        let mut packages = Self::default();
        let mut in_table = false;

        for line in raw.lines() {
            let lower = line.to_lowercase();
            if lower.contains("available packages:") {
                break;
            }
            let columns: Vec<&str> = line.split('|').map(str::trim).collect();
            if !in_table {
                in_table = columns.len() > 1 && columns[0].eq_ignore_ascii_case("path");
                continue;
            }
            if columns.len() < 2 {
                continue;
            }

            let (is_platform, path) = if let Some(rest) = columns[0].strip_prefix("platforms;") {
                (true, rest)
            } else if let Some(rest) = columns[0].strip_prefix("system-images;") {
                (false, rest)
            } else {
                continue;
            };
            let Some(api_level) = path.split(';').next().and_then(parse_api_level) else {
                continue;
            };

            let pkg = AndroidPackage {
                path: path.to_string(),
                api_level,
                description: columns.get(2).copied().unwrap_or_default().to_string(),
                location: columns.get(3).copied().unwrap_or_default().to_string(),
            };
            if is_platform {
                packages.platforms.push(pkg);
            } else {
                packages.system_images.push(pkg);
            }
        }
        packages
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.system_images.is_empty()
    }
}

/// The Android SDK as seen by the requirement checks.
pub struct AndroidSdk {
    runner: Arc<dyn CommandRunner>,
    env: EnvLookup,
    config: AndroidConfig,
    api_level: Option<u32>,
    packages: OnceCell<Result<AndroidPackages, String>>,
}

impl AndroidSdk {
    pub fn new(runner: Arc<dyn CommandRunner>, env: EnvLookup, config: AndroidConfig) -> Self {
        Self {
            runner,
            env,
            config,
            api_level: None,
            packages: OnceCell::new(),
        }
    }

    /// Accept only this API level.
    pub fn with_api_level(mut self, api_level: Option<u32>) -> Self {
        self.api_level = api_level;
        self
    }

    /// The variable that located the SDK and its value.
    pub fn sdk_root(&self) -> Option<(&'static str, PathBuf)> {
        SDK_ROOT_VARS
            .iter()
            .find_map(|var| (self.env)(var).map(|root| (*var, PathBuf::from(root))))
    }

    fn require_root(&self) -> anyhow::Result<PathBuf> {
        self.sdk_root()
            .map(|(_, root)| root)
            .ok_or_else(|| anyhow!("{} is not set", SDK_ROOT_VARS.join(" or ")))
    }

    /// Path of `sdkmanager`, preferring `cmdline-tools/latest`.
    pub fn sdkmanager(&self) -> anyhow::Result<PathBuf> {
        let root = self.require_root()?;
        let candidates = [
            root.join("cmdline-tools").join("latest").join("bin"),
            root.join("tools").join("bin"),
        ];
        candidates
            .iter()
            .map(|dir| dir.join(executable("sdkmanager")))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow!(
                    "sdkmanager not found under {}",
                    candidates[0].display()
                )
            })
    }

    /// Path of `adb` inside `platform-tools`.
    pub fn adb(&self) -> anyhow::Result<PathBuf> {
        Ok(self
            .require_root()?
            .join("platform-tools")
            .join(executable("adb")))
    }

    /// API levels accepted, most preferred first.
    pub fn accepted_api_levels(&self) -> Vec<u32> {
        match self.api_level {
            Some(level) => vec![level],
            None => self
                .config
                .supported_runtimes
                .iter()
                .filter_map(|r| parse_api_level(r))
                .collect(),
        }
    }

    /// Installed packages, listed once and shared by every check.
    pub async fn installed_packages(&self) -> anyhow::Result<&AndroidPackages> {
        let listed = self
            .packages
            .get_or_init(|| async {
                self.list_installed()
                    .await
                    .map_err(|e| format!("{:#}", e))
            })
            .await;
        listed.as_ref().map_err(|e| anyhow!("{}", e))
    }

    async fn list_installed(&self) -> anyhow::Result<AndroidPackages> {
        let sdkmanager = self.sdkmanager()?;
        let program = sdkmanager.to_string_lossy();
        let output = self
            .runner
            .run(&program, &["--list_installed"])
            .await
            .context("could not run sdkmanager")?;
        if !output.success {
            bail!("sdkmanager --list_installed failed: {}", output.combined());
        }
        let packages = AndroidPackages::parse(&output.stdout);
        tracing::debug!(
            platforms = packages.platforms.len(),
            system_images = packages.system_images.len(),
            "Listed installed Android packages"
        );
        Ok(packages)
    }

    /// First accepted platform API package that is installed.
    pub async fn find_platform_api(&self) -> anyhow::Result<AndroidPackage> {
        let packages = self.installed_packages().await?;
        self.accepted_api_levels()
            .into_iter()
            .find_map(|level| {
                packages
                    .platforms
                    .iter()
                    .find(|p| p.api_level == level && p.path == format!("android-{}", level))
            })
            .cloned()
            .ok_or_else(|| anyhow!("no supported platform API package is installed"))
    }

    /// First installed system image matching an accepted level, image and ABI.
    pub async fn find_emulator_image(&self) -> anyhow::Result<AndroidPackage> {
        let packages = self.installed_packages().await?;
        self.accepted_api_levels()
            .into_iter()
            .find_map(|level| {
                packages.system_images.iter().find(|p| {
                    p.api_level == level
                        && self.config.supported_images.iter().any(|i| i == p.emulator_image())
                        && self.config.architectures.iter().any(|a| a == p.abi())
                })
            })
            .cloned()
            .ok_or_else(|| anyhow!("no supported emulator image is installed"))
    }

    fn accepted_runtimes_label(&self) -> String {
        self.accepted_api_levels()
            .iter()
            .map(|l| format!("android-{}", l))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn executable(name: &str) -> String {
    if cfg!(windows) {
        match name {
            "sdkmanager" => format!("{}.bat", name),
            _ => format!("{}.exe", name),
        }
    } else {
        name.to_string()
    }
}

fn unix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Major Java version from `java -version` output; `1.8` counts as 8.
pub fn parse_java_major(output: &str) -> Option<u32> {
    let caps = JAVA_VERSION.captures(output)?;
    let first: u32 = caps.get(1)?.as_str().parse().ok()?;
    if first == 1 {
        caps.get(2)?.as_str().parse().ok()
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone, Copy)]
enum AndroidCheckKind {
    SdkRoot,
    Java,
    SdkTools,
    PlatformTools,
    PlatformApi,
    EmulatorImage,
}

struct AndroidCheck {
    sdk: Arc<AndroidSdk>,
    kind: AndroidCheckKind,
}

#[async_trait]
impl RequirementCheck for AndroidCheck {
    async fn check(&self, messages: &RequirementMessages) -> anyhow::Result<String> {
        let sdk = &self.sdk;
        match self.kind {
            AndroidCheckKind::SdkRoot => match sdk.sdk_root() {
                Some((var, root)) => Ok(messages.fulfilled(&[var, &unix_path(&root)])),
                None => bail!(messages.unfulfilled(&[])),
            },
            AndroidCheckKind::Java => {
                let output = sdk
                    .runner
                    .run("java", &["-version"])
                    .await
                    .map_err(|_| anyhow!(messages.unfulfilled(&["java was not found on PATH"])))?;
                let banner = output.combined();
                match parse_java_major(&banner) {
                    Some(major) if output.success && major >= 8 => {
                        Ok(messages.fulfilled(&[&major.to_string()]))
                    }
                    Some(major) if output.success => {
                        bail!(messages.unfulfilled(&[&format!("found Java {}", major)]))
                    }
                    _ => bail!(messages.unfulfilled(&[&banner])),
                }
            }
            AndroidCheckKind::SdkTools => match sdk.sdkmanager() {
                Ok(path) => Ok(messages.fulfilled(&[&unix_path(&path)])),
                Err(e) => bail!(messages.unfulfilled(&[&e.to_string()])),
            },
            AndroidCheckKind::PlatformTools => {
                let adb = sdk
                    .adb()
                    .map_err(|e| anyhow!(messages.unfulfilled(&[&e.to_string()])))?;
                let found = sdk
                    .runner
                    .run(&adb.to_string_lossy(), &["version"])
                    .await
                    .map(|o| o.success)
                    .unwrap_or(false);
                if found {
                    Ok(messages.fulfilled(&[&unix_path(&adb)]))
                } else {
                    bail!(messages.unfulfilled(&[&unix_path(&adb)]))
                }
            }
            AndroidCheckKind::PlatformApi => match sdk.find_platform_api().await {
                Ok(pkg) => Ok(messages.fulfilled(&[pkg.platform_api()])),
                Err(e) => {
                    tracing::debug!(error = %e, "Platform API lookup failed");
                    bail!(messages.unfulfilled(&[&sdk.accepted_runtimes_label()]))
                }
            },
            AndroidCheckKind::EmulatorImage => match sdk.find_emulator_image().await {
                Ok(pkg) => Ok(messages.fulfilled(&[&pkg.path])),
                Err(e) => {
                    tracing::debug!(error = %e, "Emulator image lookup failed");
                    bail!(messages.unfulfilled(&[
                        &sdk.config.supported_images.join(","),
                        &sdk.config.architectures.join(","),
                        &sdk.accepted_runtimes_label(),
                    ]))
                }
            },
        }
    }
}

fn requirement(
    sdk: &Arc<AndroidSdk>,
    kind: AndroidCheckKind,
    title: &str,
    fulfilled: &str,
    unfulfilled: &str,
) -> Requirement {
    Requirement::new(
        title,
        fulfilled,
        unfulfilled,
        AndroidCheck {
            sdk: Arc::clone(sdk),
            kind,
        },
    )
}

/// The Android `setup` requirements, in presentation order.
pub fn requirements(sdk: Arc<AndroidSdk>) -> Vec<Requirement> {
    vec![
        requirement(
            &sdk,
            AndroidCheckKind::SdkRoot,
            "Checking Android SDK root",
            "%s is set to %s",
            "Set ANDROID_HOME (or ANDROID_SDK_ROOT) to the Android SDK location.",
        ),
        requirement(
            &sdk,
            AndroidCheckKind::Java,
            "Checking Java",
            "Java %s is available",
            "Java 8 or later is required by the Android SDK tools: %s",
        ),
        requirement(
            &sdk,
            AndroidCheckKind::SdkTools,
            "Checking SDK Tools",
            "Android SDK command-line tools found at %s",
            "Install the Android SDK command-line tools: %s",
        ),
        requirement(
            &sdk,
            AndroidCheckKind::PlatformTools,
            "Checking SDK Platform Tools",
            "Android SDK platform tools found at %s",
            "Android SDK platform tools not found. Expected adb at %s.",
        )
        .with_supplemental_message("Install them with: sdkmanager \"platform-tools\""),
        requirement(
            &sdk,
            AndroidCheckKind::PlatformApi,
            "Checking SDK Platform API",
            "Found Android platform API %s",
            "Install an Android platform API package. Supported: %s",
        ),
        requirement(
            &sdk,
            AndroidCheckKind::EmulatorImage,
            "Checking SDK Emulator Images",
            "Found emulator image %s",
            "Install an emulator image of type [%s] for [%s] on one of [%s].",
        ),
    ]
}
