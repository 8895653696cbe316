//! Blocking subprocess execution
//!
//! Children inherit the driver's stdio so CMake and Ninja output streams
//! straight to the user. There is no timeout; each call waits for the child
//! to exit.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            duration,
        }
    }
}

/// Run a command to completion with inherited stdio
///
/// `cwd` becomes the child's working directory; the driver's own working
/// directory is never changed.
pub fn run_command<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute {}", program.display()))?;

    Ok(CommandResult::from_status(status, start.elapsed()))
}

/// Resolve a program name or path to an executable
pub fn find_program(program: &OsStr) -> Option<PathBuf> {
    which::which(program).ok()
}
