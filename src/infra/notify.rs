use std::io::{self, Write};
use std::sync::Mutex;

use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use crate::services::{FailureNotice, Notifier};

struct AlertLine {
    out: Mutex<Box<dyn Write + Send>>,
}

impl AlertLine {
    fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn show(&self, message: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let marker = "!".if_supports_color(Stream::Stderr, |text| text.red().bold().to_string());
        // Nowhere left to report a broken stderr.
        let _ = writeln!(out, "{marker} {message}");
        let _ = out.flush();
    }
}

/// Keeps failures in the diagnostic log. Input prompts are still shown.
pub struct LogNotifier {
    line: AlertLine,
}

impl LogNotifier {
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            line: AlertLine::new(out),
        }
    }
}

impl Notifier for LogNotifier {
    fn failure(&self, notice: &FailureNotice<'_>) {
        debug!(
            operation = %notice.operation,
            environment = %notice.environment,
            "user alert suppressed"
        );
    }

    fn prompt(&self, message: &str) {
        self.line.show(message);
    }
}

pub struct AlertNotifier {
    line: AlertLine,
}

impl AlertNotifier {
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            line: AlertLine::new(out),
        }
    }
}

impl Notifier for AlertNotifier {
    fn failure(&self, notice: &FailureNotice<'_>) {
        self.line.show(&notice.message());
    }

    fn prompt(&self, message: &str) {
        self.line.show(message);
    }
}
