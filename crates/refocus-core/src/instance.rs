//! Best-effort single-instance guard.
//!
//! Two keepers running at once would double the launch rate, so on startup
//! every other process whose executable is named like this tool gets a
//! SIGTERM. Only the executable (the first token of the command line) is
//! compared, so `tail -f refocus.log` or `sh -c "refocus ..."` are left
//! alone. There is no atomic check-and-set here: two
//! instances starting at the same moment may both survive, or kill each
//! other. Brief overlap is harmless for this workload.

use std::io::Write;
use std::path::Path;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::process::{parse_entries, ProcessEntry, ProcessSource};
use crate::status::StatusWriter;

/// File name of the executable that starts `command`.
fn executable_name(command: &str) -> Option<&str> {
    let program = command.split_whitespace().next()?;
    Path::new(program).file_name()?.to_str()
}

/// PIDs of entries whose executable file name is exactly `name`, excluding
/// `own_pid`.
pub fn find_other_instances(entries: &[ProcessEntry], name: &str, own_pid: u32) -> Vec<u32> {
    entries
        .iter()
        .filter(|e| e.pid != own_pid && executable_name(&e.command) == Some(name))
        .map(|e| e.pid)
        .collect()
}

/// Sends SIGTERM to every other running instance and returns their PIDs.
///
/// A failed process listing is treated as "no other instances". Signal
/// delivery failures (for example, the process already exited) are logged
/// and skipped.
pub fn terminate_other_instances<P, W>(
    processes: &P,
    name: &str,
    status: &mut StatusWriter<W>,
) -> Vec<u32>
where
    P: ProcessSource,
    W: Write,
{
    let listing = match processes.all() {
        Ok(listing) => listing,
        Err(e) => {
            debug!(error = %e, "could not list processes for instance check");
            return Vec::new();
        }
    };

    let own_pid = std::process::id();
    let others = find_other_instances(&parse_entries(&listing), name, own_pid);

    let mut signalled = Vec::with_capacity(others.len());
    for pid in others {
        status.line(&format!("Killing old instance: PID {}", pid));
        let Ok(raw) = i32::try_from(pid) else {
            warn!(pid, "PID out of range, skipping");
            continue;
        };
        match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
            Ok(()) => signalled.push(pid),
            Err(e) => warn!(pid, error = %e, "failed to signal old instance"),
        }
    }
    signalled
}
