//! Host environment detection.

/// Variables whose presence marks a CI run.
const CI_VARS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    detect_ci(|key| std::env::var_os(key).is_some())
}

fn detect_ci(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|key| is_set(key))
}
