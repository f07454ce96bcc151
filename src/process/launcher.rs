//! Launching external programs with streamed output.
//!
//! [`ProcessLauncher`] is the seam between the checker and the operating
//! system: it runs a program, streams each stdout/stderr line to a callback
//! as it arrives, and returns the exit code. [`SystemLauncher`] is the real
//! implementation; tests substitute scripted launchers.

use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::error::{CompatError, Result};
use crate::lines::LossyLines;

/// How often a running child is checked for exit or cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit code reported when the child was terminated by a signal.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// Options for launching a program.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Environment variables (merged with the inherited environment).
    pub env: HashMap<String, String>,
}

/// Output line from a running program, tagged with its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line text without its stream tag.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(line) | Self::Stderr(line) => line,
        }
    }

    /// Stream name for log events.
    pub fn stream(&self) -> &'static str {
        match self {
            Self::Stdout(_) => "STDOUT",
            Self::Stderr(_) => "STDERR",
        }
    }
}

/// Runs external programs on behalf of the checker.
pub trait ProcessLauncher {
    /// Run `program` to completion and return its exit code.
    ///
    /// Every output line is handed to `on_line` in arrival order. When
    /// `cancel` fires the program is killed and `CompatError::Cancelled`
    /// is returned.
    fn execute(
        &self,
        program: &Path,
        options: &LaunchOptions,
        cancel: &CancellationToken,
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<i32>;
}

/// Launcher backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SystemLauncher {
    fn execute(
        &self,
        program: &Path,
        options: &LaunchOptions,
        cancel: &CancellationToken,
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<i32> {
        cancel.check()?;

        let launch_failed = |message: String| CompatError::LaunchFailed {
            program: program.display().to_string(),
            message,
        };

        let mut cmd = Command::new(program);
        cmd.args(&options.args);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| launch_failed(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| launch_failed("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| launch_failed("stderr was not captured".to_string()))?;

        // Both readers feed one queue; this thread is the only writer to the
        // caller's buffer.
        let (tx, rx) = mpsc::channel();
        let stdout_handle = spawn_reader(stdout, tx.clone(), OutputLine::Stdout);
        let stderr_handle = spawn_reader(stderr, tx, OutputLine::Stderr);

        loop {
            if cancel.is_cancelled() {
                kill(&mut child);
                return Err(CompatError::Cancelled);
            }
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => on_line(line),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        stdout_handle.join().ok();
        stderr_handle.join().ok();

        // Pipes are closed but the program may still be running.
        loop {
            if cancel.is_cancelled() {
                kill(&mut child);
                return Err(CompatError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE)),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(launch_failed(e.to_string())),
            }
        }
    }
}

fn spawn_reader<R, F>(stream: R, tx: Sender<OutputLine>, tag: F) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
    F: Fn(String) -> OutputLine + Send + 'static,
{
    thread::spawn(move || {
        // Drain to EOF even if the receiver is gone, so the child never
        // sees a closed pipe.
        for line in LossyLines::new(BufReader::new(stream)) {
            match line {
                Ok(line) => {
                    tx.send(tag(line)).ok();
                }
                Err(e) => {
                    tracing::debug!("Stopped reading program output: {}", e);
                    break;
                }
            }
        }
    })
}

fn kill(child: &mut Child) {
    tracing::debug!("Killing process {} after cancellation", child.id());
    child.kill().ok();
    child.wait().ok();
}
