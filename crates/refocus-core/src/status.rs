//! Labelled, line-flushed status output.
//!
//! CI harnesses capture this tool's stdout and interleave it with their own
//! logs, so every message carries a fixed label and is flushed as soon as it
//! is written.

use std::io::{self, Write};

use tracing::{debug, info};

/// Label prefixed to every status line.
pub const DEFAULT_LABEL: &str = "App Lifecycle Helper Script";

/// Writes `"<label>: <message>"` lines to an underlying writer.
pub struct StatusWriter<W: Write> {
    label: String,
    out: W,
}

impl StatusWriter<io::Stdout> {
    /// Status writer on standard output with [`DEFAULT_LABEL`].
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StatusWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_label(out, DEFAULT_LABEL)
    }

    pub fn with_label(out: W, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            out,
        }
    }

    /// Writes one status line and flushes.
    pub fn line(&mut self, message: &str) {
        info!(target: "refocus::status", "{}", message);
        let result = writeln!(self.out, "{}: {}", self.label, message)
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!(error = %e, "failed to write status line");
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
