//! # refocus-core
//!
//! Core library for keeping an app in the foreground on a booted iOS,
//! tvOS, or visionOS simulator while its lifecycle tests run.
//!
//! Apps cannot bring themselves back to the foreground, so tests that
//! background the app wait for an outside process to re-launch it. This
//! crate watches for the app under test, re-launches it on a fixed interval
//! once it has been seen, and stops when it exits.
//!
//! ## Modules
//!
//! - [`process`] - `pgrep`/`ps` wrappers and listing parsers
//! - [`detect`] - Decides whether a listing shows the simulator app running
//! - [`simctl`] - Wrapper around `xcrun simctl launch`
//! - [`foreground`] - The lifecycle state machine and poll loop
//! - [`instance`] - Best-effort single-instance guard
//! - [`status`] - Labelled status lines on stdout
//! - [`config`] - Persistent settings in `~/.refocus/config.json`
//!
//! ## External Dependencies
//!
//! - **Xcode** (for `xcrun simctl`)
//! - `pgrep` and `ps`, present on every macOS install
//!
//! ## Example
//!
//! ```no_run
//! use refocus_core::detect::AppDetector;
//! use refocus_core::process::{ProcessSource, SystemProcesses};
//! use refocus_core::simctl::{Simctl, BOOTED};
//!
//! let detector = AppDetector::for_simulator("Foo.app");
//! if let Ok(listing) = SystemProcesses.matching("Foo.app") {
//!     if detector.is_running(&listing) {
//!         Simctl::launch(BOOTED, "com.unity.Foo").expect("launch failed");
//!     }
//! }
//! ```

pub mod config;
pub mod detect;
pub mod foreground;
pub mod instance;
pub mod process;
pub mod simctl;
pub mod status;
