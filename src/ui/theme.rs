//! Visual theme and styling.

use console::Style;

/// Console styles shared by the UI and the result tree.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for durations (dim).
    pub duration: Style,
    /// Style for tree branches (dim).
    pub border: Style,
    /// Style for remediation hints (cyan dim).
    pub hint: Style,
    /// Style for passed test cases (green bold).
    pub passed: Style,
    /// Style for failed test cases (red bold).
    pub failed: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            duration: Style::new().dim(),
            border: Style::new().dim(),
            hint: Style::new().cyan().dim(),
            passed: Style::new().green().bold(),
            failed: Style::new().red().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            duration: Style::new(),
            border: Style::new(),
            hint: Style::new(),
            passed: Style::new(),
            failed: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a remediation hint.
    pub fn format_hint(&self, hint: &str) -> String {
        format!("{}", self.hint.apply_to(format!("→ {}", hint)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("▣"),
            self.highlight.apply_to(title)
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_status_icons() {
        let theme = Theme::plain();
        assert_eq!(theme.format_success("Complete"), "✓ Complete");
        assert_eq!(theme.format_warning("Caution"), "⚠ Caution");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_hint("Install Xcode"), "→ Install Xcode");
    }

    #[test]
    fn formats_header() {
        let msg = Theme::plain().format_header("Android setup");
        assert_eq!(msg, "▣ Android setup");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = Theme::new();
        assert!(theme.format_success("test").contains("test"));
        let _ = theme.passed.apply_to("Passed");
        let _ = theme.failed.apply_to("Failed");
    }
}
