//! # mdi Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every external program `mdi` drives (the archiver and the container tool)
//! is started through this module. It wraps `tokio::process::Command` so that
//! callers get:
//!
//! - the exit status plus captured stdout/stderr in one `CommandOutput`,
//! - an optional timeout, after which the child is killed,
//! - a printable command line for logs and error messages.
//!
//! Interpreting a non-zero exit is left to the caller, since the archiver and
//! the container tool map it onto different `MdiError` variants.
//!
//! ## Usage
//!
//! ```rust
//! let output = process::run_captured("tar", &["-cf", "out.tar", "a.txt"], None).await?;
//! if !output.status.success() {
//!     eprintln!("{}", output.combined());
//! }
//! ```
//!
use crate::core::error::{MdiError, Result};
use anyhow::Context;
use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Result of a finished child process.
#[derive(Debug)]
pub struct CommandOutput {
    /// The command line, for messages.
    pub cmd: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout and stderr joined, trimmed, skipping whichever is empty.
    pub fn combined(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (true, true) => String::new(),
            (false, true) => out.to_string(),
            (true, false) => err.to_string(),
            (false, false) => format!("{}\n{}", out, err),
        }
    }
}

/// Formats `program args...` for logs and error messages.
pub fn display_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut cmd = program.to_string();
    for arg in args {
        cmd.push(' ');
        cmd.push_str(&arg.as_ref().to_string_lossy());
    }
    cmd
}

/// Runs `program` with `args`, waits for it, and captures its output.
///
/// Stdin is closed. When `timeout` elapses first, the child is killed and a
/// `MdiError::Timeout` is returned. Failing to spawn the program (e.g. it is
/// not installed) is returned as a plain contextual error; callers attach the
/// domain-specific kind.
pub async fn run_captured<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    timeout: Option<Duration>,
) -> Result<CommandOutput> {
    let cmd = display_command(program, args);
    debug!("Running: {}", cmd);

    // Stdin is closed so a tool waiting for input cannot hang the run.
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start '{}'", program))?;

    // Dropping the `wait_with_output` future on timeout drops the child, which kills it.
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => {
                anyhow::bail!(MdiError::Timeout { cmd, after: limit });
            }
        },
        None => child.wait_with_output().await,
    }
    .with_context(|| format!("Failed to wait for '{}'", cmd))?;

    // Tools may print non-UTF-8 bytes (file names); keep them lossily.
    let result = CommandOutput {
        cmd,
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    trace!(
        "'{}' finished: status={}, stdout='{}', stderr='{}'",
        result.cmd,
        result.status,
        result.stdout,
        result.stderr
    );
    Ok(result)
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captured_collects_stdout() -> Result<()> {
        let output = run_captured("echo", &["hello", "world"], None).await?;
        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert_eq!(output.cmd, "echo hello world");
        Ok(())
    }

    #[tokio::test]
    async fn test_run_captured_reports_failure_status() -> Result<()> {
        let output = run_captured("sh", &["-c", "echo oops >&2; exit 3"], None).await?;
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.combined(), "oops");
        Ok(())
    }

    #[tokio::test]
    async fn test_run_captured_times_out() {
        let err = run_captured("sleep", &["5"], Some(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(MdiError::is_kind(&err, |e| matches!(e, MdiError::Timeout { .. })));
        assert!(format!("{:#}", err).contains("timed out after 100ms"));
    }

    #[tokio::test]
    async fn test_run_captured_missing_program() {
        let result = run_captured("mdi-no-such-program", &["x"], None).await;
        assert!(result.is_err());
    }
}
