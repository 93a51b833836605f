//! Host process listing.
//!
//! Even though the app under test runs inside a simulator, it is still an
//! ordinary macOS process, so `pgrep`/`ps` can see it. This module wraps
//! those two commands and parses their line-oriented output.
//!
//! # Example
//!
//! ```no_run
//! use refocus_core::process::{parse_entries, ProcessSource, SystemProcesses};
//!
//! let listing = SystemProcesses.all().unwrap();
//! for entry in parse_entries(&listing) {
//!     println!("{} {}", entry.pid, entry.command);
//! }
//! ```

use std::process::Command;

use thiserror::Error;

/// Errors that can occur while listing processes.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The listing command exited with a non-zero status.
    ///
    /// `pgrep` exits with status 1 when nothing matches, so "no process"
    /// also surfaces as this variant.
    #[error("Process listing failed: {0}")]
    CommandFailed(String),

    /// An I/O error occurred while executing the command.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed line of `pid command` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub command: String,
}

/// A source of process listings.
///
/// Both methods return the raw text output, one process per line, with the
/// PID as the first whitespace-separated token.
pub trait ProcessSource {
    /// Lists processes whose full command line contains `pattern`.
    fn matching(&self, pattern: &str) -> Result<String, ProcessError>;

    /// Lists every process as a `pid,command` table.
    fn all(&self) -> Result<String, ProcessError>;
}

/// [`ProcessSource`] backed by the host's `pgrep` and `ps` binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcesses;

impl SystemProcesses {
    fn run(program: &str, args: &[&str]) -> Result<String, ProcessError> {
        let output = Command::new(program).args(args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("{} exited with {}", program, output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(ProcessError::CommandFailed(detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ProcessSource for SystemProcesses {
    fn matching(&self, pattern: &str) -> Result<String, ProcessError> {
        Self::run("pgrep", &["-fl", pattern])
    }

    fn all(&self) -> Result<String, ProcessError> {
        Self::run("ps", &["axo", "pid,command"])
    }
}

/// Splits a listing line into its PID token and the rest of the command.
///
/// Returns `None` for lines with fewer than two whitespace-separated tokens.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let split = line.find(char::is_whitespace)?;
    let (pid, rest) = line.split_at(split);
    let command = rest.trim_start();
    if command.is_empty() {
        return None;
    }
    Some((pid, command))
}

/// Parses listing output into entries, skipping malformed lines and lines
/// whose first token is not a PID (such as the `ps` header).
pub fn parse_entries(text: &str) -> Vec<ProcessEntry> {
    text.lines()
        .filter_map(parse_line)
        .filter_map(|(pid, command)| {
            pid.parse::<u32>().ok().map(|pid| ProcessEntry {
                pid,
                command: command.to_string(),
            })
        })
        .collect()
}
