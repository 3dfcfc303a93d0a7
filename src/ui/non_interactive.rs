//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain lines, no spinners and no colors, so CI logs stay readable.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  → {}", hint);
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(LogSpinner {
            show: self.mode.shows_spinners(),
            message: message.to_string(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that only prints the final line.
struct LogSpinner {
    show: bool,
    message: String,
}

impl SpinnerHandle for LogSpinner {
    fn set_message(&mut self, msg: &str) {
        self.message = msg.to_string();
    }

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.show {
            eprintln!("✗ {}", msg);
        }
    }

    fn clear(&mut self) {}
}
