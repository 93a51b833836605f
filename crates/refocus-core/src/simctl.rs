//! Interface to Apple's `xcrun simctl` command-line tool.
//!
//! Only the `launch` subcommand is needed here. Launching a bundle that is
//! already running brings it to the foreground, as if the user tapped its
//! icon on the home screen.
//!
//! # Requirements
//!
//! Xcode must be installed for `xcrun simctl` to be available.
//!
//! # Example
//!
//! ```no_run
//! use refocus_core::simctl::{Simctl, BOOTED};
//!
//! Simctl::launch(BOOTED, "com.unity.PolySpatialTest").unwrap();
//! ```

use std::process::Command;

use thiserror::Error;

/// Device selector that targets whichever simulator is currently booted.
pub const BOOTED: &str = "booted";

/// Errors that can occur when interacting with simctl.
#[derive(Error, Debug)]
pub enum SimctlError {
    /// A simctl command failed to execute successfully.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// An I/O error occurred while executing the command.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrapper for `xcrun simctl` commands.
///
/// All methods are synchronous and execute shell commands.
pub struct Simctl;

impl Simctl {
    /// Launches (or foregrounds) an installed app.
    ///
    /// Runs `xcrun simctl launch <device> <bundle_id>`. `device` is either a
    /// UDID or [`BOOTED`].
    ///
    /// # Errors
    ///
    /// - [`SimctlError::Io`] if `xcrun` cannot be executed
    /// - [`SimctlError::CommandFailed`] if simctl returns a non-zero exit code
    pub fn launch(device: &str, bundle_id: &str) -> Result<(), SimctlError> {
        let output = Command::new("xcrun")
            .args(["simctl", "launch", device, bundle_id])
            .output()?;

        if !output.status.success() {
            return Err(SimctlError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

/// Something that can bring an app to the foreground by bundle identifier.
pub trait AppLauncher {
    fn launch(&self, bundle_id: &str) -> Result<(), SimctlError>;
}

/// [`AppLauncher`] that shells out to `xcrun simctl launch`.
#[derive(Debug, Clone)]
pub struct SimctlLauncher {
    device: String,
}

impl SimctlLauncher {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Default for SimctlLauncher {
    fn default() -> Self {
        Self::new(BOOTED)
    }
}

impl AppLauncher for SimctlLauncher {
    fn launch(&self, bundle_id: &str) -> Result<(), SimctlError> {
        Simctl::launch(&self.device, bundle_id)
    }
}
