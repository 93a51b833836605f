//! Shared test helpers for refocus-core integration tests.
//!
//! Fakes for the process source, launcher, and status sink that record what
//! the foreground loop did so tests can inspect it after `run` consumes the
//! keeper.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use refocus_core::process::{ProcessError, ProcessSource};
use refocus_core::simctl::{AppLauncher, SimctlError};

pub const APP_NAME: &str = "Foo.app";
pub const BUNDLE_ID: &str = "com.unity.Foo";
pub const SIM_LINE: &str = "1234 /path/CoreSimulator/Devices/X/data/Containers/Bundle/Application/Y/Foo.app/Foo";

/// One canned `pgrep` result.
#[derive(Clone)]
pub enum Listing {
    Running,
    Absent,
    Fails,
    Raw(String),
}

/// Process source that replays a fixed script of listings, then reports
/// "no match" forever.
#[derive(Clone)]
pub struct ScriptedProcesses {
    script: Arc<Mutex<VecDeque<Listing>>>,
    lookups: Arc<Mutex<usize>>,
}

impl ScriptedProcesses {
    pub fn new(script: Vec<Listing>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    /// Source that always reports the app as running.
    pub fn always_running() -> Self {
        Self::new(vec![Listing::Running; 10_000])
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

impl ProcessSource for ScriptedProcesses {
    fn matching(&self, _pattern: &str) -> Result<String, ProcessError> {
        *self.lookups.lock().unwrap() += 1;
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Listing::Fails);
        match next {
            Listing::Running => Ok(format!("{}\n5678 refocus {} {}\n", SIM_LINE, APP_NAME, BUNDLE_ID)),
            Listing::Absent => Ok(format!("5678 refocus {} {}\n", APP_NAME, BUNDLE_ID)),
            Listing::Fails => Err(ProcessError::CommandFailed("pgrep exited with exit status: 1".into())),
            Listing::Raw(text) => Ok(text),
        }
    }

    fn all(&self) -> Result<String, ProcessError> {
        Ok(String::new())
    }
}

/// Launcher that records every bundle id it was asked to launch.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AppLauncher for RecordingLauncher {
    fn launch(&self, bundle_id: &str) -> Result<(), SimctlError> {
        self.calls.lock().unwrap().push(bundle_id.to_string());
        if self.fail {
            Err(SimctlError::CommandFailed("Unable to lookup in current state: Shutdown".into()))
        } else {
            Ok(())
        }
    }
}

/// Cloneable in-memory writer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
