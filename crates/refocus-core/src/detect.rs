//! Decides whether the app under test is running on the simulator.
//!
//! A `pgrep -fl Foo.app` listing also matches this tool's own command line
//! and any installer invoked with the app path. The copy installed on a
//! simulator always lives under a `CoreSimulator` directory, so a line only
//! counts when it contains both the app name and that marker.

use crate::process::parse_line;

/// Path fragment present in every simulator-installed app's executable path.
pub const DEFAULT_MARKER: &str = "CoreSimulator";

/// Matches process listing lines against an app name and a path marker.
#[derive(Debug, Clone)]
pub struct AppDetector {
    app_name: String,
    marker: String,
}

impl AppDetector {
    pub fn new(app_name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            marker: marker.into(),
        }
    }

    /// Creates a detector using [`DEFAULT_MARKER`].
    pub fn for_simulator(app_name: impl Into<String>) -> Self {
        Self::new(app_name, DEFAULT_MARKER)
    }

    /// Returns every well-formed line that names the running app.
    ///
    /// Lines with fewer than two tokens are ignored.
    pub fn find_running<'a>(&self, listing: &'a str) -> Vec<&'a str> {
        listing
            .lines()
            .filter(|line| parse_line(line).is_some())
            .filter(|line| line.contains(&self.app_name) && line.contains(&self.marker))
            .map(str::trim)
            .collect()
    }

    pub fn is_running(&self, listing: &str) -> bool {
        !self.find_running(listing).is_empty()
    }
}
