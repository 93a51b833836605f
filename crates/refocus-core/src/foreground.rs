//! The foreground keeper: a polling state machine that re-launches the app
//! under test until it exits.
//!
//! Apps on iOS and visionOS cannot bring themselves back to the foreground,
//! so lifecycle tests that background the app would time out without an
//! outside nudge. Each poll cycle lists processes, checks whether the app is
//! running, and issues `simctl launch` once the app has been seen at least
//! once. When a previously seen app disappears, the test run is over and
//! the keeper stops.
//!
//! ```text
//! NotYetSeen --(app running)--> SeenRunning --(app gone)--> Terminated
//!                                   |  ^
//!                                   +--+ launch every cycle
//! ```
//!
//! # Example
//!
//! ```no_run
//! use refocus_core::foreground::{AppTarget, Foregrounder, ForegroundConfig};
//! use refocus_core::process::SystemProcesses;
//! use refocus_core::simctl::SimctlLauncher;
//! use refocus_core::status::StatusWriter;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let target = AppTarget::new("Foo.app", "com.unity.Foo");
//!     let keeper = Foregrounder::new(
//!         target,
//!         ForegroundConfig::default(),
//!         SystemProcesses,
//!         SimctlLauncher::default(),
//!         StatusWriter::stdout(),
//!     );
//!     keeper.run(CancellationToken::new()).await;
//! }
//! ```

use std::io::Write;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, info, warn};

use crate::detect::{AppDetector, DEFAULT_MARKER};
use crate::process::ProcessSource;
use crate::simctl::AppLauncher;
use crate::status::StatusWriter;

/// Default delay between poll cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest delay the loop will sleep between cycles. Anything lower would
/// flood the simulator with launch commands.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// The app being kept in the foreground. Immutable for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    /// Bundle directory name as it appears in process paths, e.g. `Foo.app`.
    pub app_name: String,
    /// Reverse-domain bundle identifier passed to `simctl launch`.
    pub bundle_id: String,
}

impl AppTarget {
    pub fn new(app_name: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            bundle_id: bundle_id.into(),
        }
    }
}

/// Tuning for the poll loop.
#[derive(Debug, Clone)]
pub struct ForegroundConfig {
    /// Delay between cycles (default: 10s, never less than [`MIN_INTERVAL`]).
    pub interval: Duration,
    /// Path fragment that marks the simulator copy of the app.
    pub marker: String,
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Where the keeper is in the app's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The app has not been observed running yet.
    NotYetSeen,
    /// The app has been observed at least once. Never reverts.
    SeenRunning,
    /// A previously seen app is gone; the loop must stop.
    Terminated,
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// App not running and never seen; nothing to do yet.
    Waiting,
    /// First sighting. The flag is set but no launch is issued so the app
    /// can finish starting up.
    Armed,
    /// `simctl launch` succeeded.
    Foregrounded,
    /// `simctl launch` failed; the loop keeps going.
    LaunchFailed(String),
    /// The app exited after having been seen.
    Terminated,
}

/// Why [`Foregrounder::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The app under test exited.
    AppExited,
    /// The cancellation token fired.
    Cancelled,
}

/// Drives the lifecycle state machine against a process source and launcher.
pub struct Foregrounder<P, L, W: Write> {
    target: AppTarget,
    config: ForegroundConfig,
    detector: AppDetector,
    processes: P,
    launcher: L,
    status: StatusWriter<W>,
    state: LifecycleState,
}

impl<P, L, W> Foregrounder<P, L, W>
where
    P: ProcessSource,
    L: AppLauncher,
    W: Write,
{
    pub fn new(
        target: AppTarget,
        config: ForegroundConfig,
        processes: P,
        launcher: L,
        status: StatusWriter<W>,
    ) -> Self {
        let detector = AppDetector::new(target.app_name.clone(), config.marker.clone());
        Self {
            target,
            config,
            detector,
            processes,
            launcher,
            status,
            state: LifecycleState::NotYetSeen,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn status(&self) -> &StatusWriter<W> {
        &self.status
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs one poll cycle and advances the state machine.
    ///
    /// Calling this after [`LifecycleState::Terminated`] has been reached
    /// returns [`CycleOutcome::Terminated`] without touching the system.
    pub fn poll_once(&mut self) -> CycleOutcome {
        if self.state == LifecycleState::Terminated {
            return CycleOutcome::Terminated;
        }

        let seen = self.state == LifecycleState::SeenRunning;

        let listing = match self.processes.matching(&self.target.app_name) {
            Ok(listing) => listing,
            Err(e) => {
                // pgrep reports "no match" as a failure; both mean "not running".
                debug!(error = %e, "process lookup failed");
                return self.not_running(seen);
            }
        };

        let found = self.detector.find_running(&listing);
        for line in &found {
            self.status.line(&format!("Found running app: {}", line));
        }
        if found.is_empty() {
            return self.not_running(seen);
        }

        if !seen {
            info!(app = %self.target.app_name, "app detected, arming foreground loop");
            self.state = LifecycleState::SeenRunning;
            return CycleOutcome::Armed;
        }

        let bundle_id = &self.target.bundle_id;
        self.status.line(&format!(
            "Has detected running app. Trying to launch {}",
            bundle_id
        ));
        match self.launcher.launch(bundle_id) {
            Ok(()) => {
                self.status
                    .line(&format!("App {} brought to foreground.", bundle_id));
                CycleOutcome::Foregrounded
            }
            Err(e) => {
                warn!(error = %e, bundle_id = %bundle_id, "launch failed");
                self.status
                    .line(&format!("Failed to bring app to foreground: {}", e));
                CycleOutcome::LaunchFailed(e.to_string())
            }
        }
    }

    fn not_running(&mut self, seen: bool) -> CycleOutcome {
        if seen {
            self.status.line("Terminate Self.");
            self.state = LifecycleState::Terminated;
            CycleOutcome::Terminated
        } else {
            CycleOutcome::Waiting
        }
    }

    /// Polls until the app exits or `cancel_token` fires.
    ///
    /// The first cycle runs immediately; later cycles wait
    /// [`ForegroundConfig::interval`] (at least [`MIN_INTERVAL`]). Process and
    /// launch commands block the current task, which is the only task this
    /// loop expects to share a runtime with.
    pub async fn run(mut self, cancel_token: CancellationToken) -> RunExit {
        let interval = self.config.interval.max(MIN_INTERVAL);
        let mut cycle: u64 = 0;
        loop {
            if cancel_token.is_cancelled() {
                return RunExit::Cancelled;
            }

            cycle += 1;
            let outcome = {
                let _span = debug_span!("poll_cycle", cycle).entered();
                self.poll_once()
            };
            debug!(cycle, ?outcome, state = ?self.state, "poll cycle finished");

            if outcome == CycleOutcome::Terminated {
                return RunExit::AppExited;
            }

            tokio::select! {
                _ = cancel_token.cancelled() => {
                    return RunExit::Cancelled;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
