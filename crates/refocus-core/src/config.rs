//! Persistent configuration for refocus.
//!
//! Stores defaults in `~/.refocus/config.json` so a CI machine can tune the
//! poll interval or target a specific simulator without changing the command
//! line baked into a test pipeline. Command-line flags override file values.
//!
//! # Example
//!
//! ```no_run
//! use refocus_core::config::RefocusConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = RefocusConfig::load();
//! println!("polling every {}s on {}", config.interval_secs, config.device);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detect::DEFAULT_MARKER;
use crate::foreground::{ForegroundConfig, MIN_INTERVAL};
use crate::simctl::BOOTED;

const CONFIG_FILENAME: &str = "config.json";

/// Returns the refocus data directory (`~/.refocus`), creating it if needed.
///
/// Falls back to the system temp directory when no home directory is known,
/// which happens on some stripped-down CI runners.
pub fn refocus_dir() -> PathBuf {
    let dir = dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".refocus");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Persistent refocus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefocusConfig {
    /// Seconds between poll cycles.
    pub interval_secs: u64,

    /// Simulator to launch on: a UDID or `booted`.
    pub device: String,

    /// Path fragment identifying the simulator-installed app process.
    pub marker: String,

    /// Executable file name the single-instance guard looks for in other
    /// processes. `None` means this executable's file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,

    /// Whether to SIGTERM other running instances at startup.
    pub kill_siblings: bool,
}

impl Default for RefocusConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            device: BOOTED.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            instance_name: None,
            kill_siblings: true,
        }
    }
}

impl RefocusConfig {
    /// Load config from `~/.refocus/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(refocus_dir().join(CONFIG_FILENAME))
    }

    /// Load config from an explicit path, with the same fallback as [`load`](Self::load).
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        std::fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }

    /// Poll interval, raised to [`MIN_INTERVAL`] when the file says 0.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs).max(MIN_INTERVAL)
    }

    /// The poll-loop settings carried by this config.
    pub fn foreground_config(&self) -> ForegroundConfig {
        ForegroundConfig {
            interval: self.interval(),
            marker: self.marker.clone(),
        }
    }
}
