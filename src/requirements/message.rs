//! Message template rendering.
//!
//! Requirement messages carry `%s` placeholders that checks fill in with
//! what they discovered (a path, a version, the reason a command failed).

/// Render a `%s` template with positional arguments.
///
/// Placeholders are filled left to right. Arguments left over once every
/// placeholder is used are appended, separated by a space. Placeholders
/// left over once the arguments run out stay in the output verbatim.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);

    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_placeholders_in_order() {
        let msg = format_message("%s is set to %s", &["ANDROID_HOME", "/opt/sdk"]);
        assert_eq!(msg, "ANDROID_HOME is set to /opt/sdk");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(format_message("Xcode detected.", &[]), "Xcode detected.");
    }

    #[test]
    fn surplus_arguments_are_appended() {
        let msg = format_message("Found %s", &["adb", "35.0.1"]);
        assert_eq!(msg, "Found adb 35.0.1");
    }

    #[test]
    fn missing_arguments_leave_placeholder() {
        let msg = format_message("Install %s or %s", &["android-29"]);
        assert_eq!(msg, "Install android-29 or %s");
    }

    #[test]
    fn handles_multibyte_text_around_placeholders() {
        let msg = format_message("✓ %s → ok", &["xcuitest"]);
        assert_eq!(msg, "✓ xcuitest → ok");
    }
}
