//! Keeps a simulator app in the foreground until it exits.
//!
//! Apps on iOS, tvOS, and visionOS cannot bring themselves back to the
//! foreground, so lifecycle tests that background the app time out unless
//! something outside re-launches it. Start `refocus` before the test player
//! launches; it waits for the app to appear on the booted simulator,
//! re-launches it every interval, and exits once the app quits.
//!
//! Every status line on stdout starts with `App Lifecycle Helper Script:`,
//! so existing CI log filters for the lifecycle helper keep matching.
//!
//! # Usage
//!
//! ```bash
//! # Foreground PolySpatialTest.app every 10 seconds
//! refocus PolySpatialTest.app com.Unity.PolySpatialTest
//!
//! # Faster polling on a specific simulator
//! refocus Foo.app com.unity.Foo --interval 5 --device A1B2C3D4-E5F6-7890-ABCD-EF1234567890
//!
//! # Write logs to a file instead of stderr
//! RUST_LOG=debug refocus Foo.app com.unity.Foo --log-dir /tmp/refocus-logs
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use refocus_core::config::RefocusConfig;
use refocus_core::foreground::{AppTarget, Foregrounder, RunExit};
use refocus_core::instance::terminate_other_instances;
use refocus_core::process::SystemProcesses;
use refocus_core::simctl::SimctlLauncher;
use refocus_core::status::StatusWriter;

/// Re-foreground a simulator app until it exits.
#[derive(Parser)]
#[command(name = "refocus")]
#[command(about = "Keep a simulator app in the foreground during lifecycle tests")]
#[command(
    after_help = "Example: refocus TestProject.app com.unity.TestProject"
)]
#[command(version)]
struct Args {
    /// App bundle name as it appears in the process path (e.g. TestProject.app)
    app_name: String,

    /// Bundle identifier to launch (e.g. com.unity.TestProject)
    bundle_id: String,

    /// Seconds between checks (at least 1)
    #[arg(
        short,
        long,
        env = "REFOCUS_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: Option<u64>,

    /// Simulator UDID, or "booted" for the currently booted one
    #[arg(short, long, env = "REFOCUS_DEVICE")]
    device: Option<String>,

    /// Path fragment identifying the simulator copy of the app
    #[arg(long)]
    marker: Option<String>,

    /// Name used to find other running instances (defaults to this executable's name)
    #[arg(long)]
    instance_name: Option<String>,

    /// Leave other running instances alone
    #[arg(long)]
    no_kill_siblings: bool,

    /// Config file (defaults to ~/.refocus/config.json)
    #[arg(short, long, env = "REFOCUS_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs to refocus.log in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    /// File config with command-line overrides applied.
    fn resolve_config(&self) -> RefocusConfig {
        let mut config = match &self.config {
            Some(path) => RefocusConfig::load_from(path),
            None => RefocusConfig::load(),
        };
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(marker) = &self.marker {
            config.marker = marker.clone();
        }
        if let Some(name) = &self.instance_name {
            config.instance_name = Some(name.clone());
        }
        if self.no_kill_siblings {
            config.kill_siblings = false;
        }
        config
    }
}

fn init_logging(log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "refocus.log");
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file_appender)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// File name of the running executable, used to spot sibling instances.
fn own_executable_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "refocus".to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref());

    let config = args.resolve_config();
    info!(
        app = %args.app_name,
        bundle_id = %args.bundle_id,
        interval_secs = config.interval_secs,
        device = %config.device,
        "Starting refocus"
    );

    let mut status = StatusWriter::stdout();

    if config.kill_siblings {
        let name = config
            .instance_name
            .clone()
            .unwrap_or_else(own_executable_name);
        let killed = terminate_other_instances(&SystemProcesses, &name, &mut status);
        if !killed.is_empty() {
            info!(?killed, "Terminated old instances");
        }
    }

    let cancel_token = CancellationToken::new();
    let mut sigterm = signal(SignalKind::terminate())?;
    let keeper = Foregrounder::new(
        AppTarget::new(args.app_name, args.bundle_id),
        config.foreground_config(),
        SystemProcesses,
        SimctlLauncher::new(config.device.clone()),
        status,
    );

    let run = keeper.run(cancel_token.clone());
    tokio::pin!(run);

    let exit = tokio::select! {
        exit = &mut run => exit,
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT");
            cancel_token.cancel();
            run.await
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
            cancel_token.cancel();
            run.await
        }
    };

    match exit {
        RunExit::AppExited => info!("App exited, stopping"),
        RunExit::Cancelled => info!("Stopped by signal"),
    }

    Ok(())
}
