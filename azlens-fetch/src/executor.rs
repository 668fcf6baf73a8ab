//! Subprocess execution for the Azure CLI.
//!
//! The engine never speaks to Azure directly; every query is an `az`
//! invocation behind the [`CommandExecutor`] trait, which keeps the
//! coordinator and client testable with scripted executors.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ProcessError;

/// Default command timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Process Output
// ============================================================================

/// Output from a process execution.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output content.
    pub stdout: String,
    /// Standard error content.
    pub stderr: String,
    /// Exit code (0 = success).
    pub exit_code: i32,
    /// How long the command took to execute.
    pub duration: Duration,
}

impl ProcessOutput {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the stdout if successful, otherwise an error.
    pub fn stdout_if_success(&self) -> Result<&str, ProcessError> {
        if self.success() {
            Ok(&self.stdout)
        } else {
            Err(ProcessError::NonZeroExit {
                code: self.exit_code,
                stderr: self.stderr.clone(),
            })
        }
    }
}

// ============================================================================
// Command Executor
// ============================================================================

/// Asynchronous subprocess capability consumed by the engine.
///
/// Implementations must never block the calling task beyond the await
/// points of the child process itself; a timeout is reported as
/// [`ProcessError::Timeout`], which callers treat like a non-zero exit.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs a command and captures its output.
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError>;
}

// ============================================================================
// Az CLI Runner
// ============================================================================

/// Production [`CommandExecutor`] backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct AzCliRunner;

impl AzCliRunner {
    /// Creates a new runner.
    pub fn new() -> Self {
        Self
    }

    /// Check if a command exists on PATH.
    pub fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }

    /// Find the path to a command.
    pub fn which(&self, cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }
}

#[async_trait]
impl CommandExecutor for AzCliRunner {
    #[instrument(skip(self, args), fields(cmd = %program))]
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        debug!(args = ?args, "Running command");

        let cmd_path = self.which(program).ok_or_else(|| {
            warn!(cmd = %program, "Command not found");
            ProcessError::NotFound(program.to_string())
        })?;

        let start = Instant::now();

        let mut command = Command::new(&cmd_path);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(cmd = %program, timeout = ?timeout, "Command timed out");
                return Err(ProcessError::Timeout(timeout));
            }
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            duration,
        };

        debug!(
            exit_code = exit_code,
            duration = ?duration,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "Command completed"
        );

        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_command_exists() {
        let runner = AzCliRunner::new();

        assert!(runner.command_exists("echo"));
        assert!(!runner.command_exists("definitely_not_a_real_command_12345"));
    }

    #[tokio::test]
    async fn test_run_echo() {
        let runner = AzCliRunner::new();

        let output = runner
            .execute("echo", &args(&["hello", "world"]), DEFAULT_TIMEOUT)
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_failure_captures_stderr() {
        let runner = AzCliRunner::new();

        let output = runner
            .execute(
                "ls",
                &args(&["/definitely/not/a/real/path/12345"]),
                DEFAULT_TIMEOUT,
            )
            .await
            .unwrap();

        assert!(!output.success());
        assert!(!output.stderr.is_empty());
        assert!(output.stdout_if_success().is_err());
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let runner = AzCliRunner::new();

        let result = runner
            .execute("not_a_real_command_xyz", &[], DEFAULT_TIMEOUT)
            .await;

        assert!(matches!(result, Err(ProcessError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_timeout_reported() {
        let runner = AzCliRunner::new();

        let result = runner
            .execute("sleep", &args(&["5"]), Duration::from_millis(50))
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout(_))));
    }
}
