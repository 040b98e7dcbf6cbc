//! # External Command Execution
//!
//! `CommandRunner` is the seam between the orchestrator and the processes it
//! launches. `SystemCommandExecutor` is the real implementation.

pub mod executor;

pub use executor::SystemCommandExecutor;

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Runs an external program to completion and captures its output
pub trait CommandRunner: Send + Sync {
    /// `timeout` of `None` waits indefinitely
    fn execute(
        &self,
        program: &Path,
        args: &[&OsStr],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, CommandError>;
}

/// Command execution output
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// -1 when the process was terminated by a signal
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Command execution errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Execution failed for '{program}': {reason}")]
    ExecutionFailed { program: String, reason: String },

    #[error("'{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("Permission denied: {program}")]
    PermissionDenied { program: String },

    #[error("Security violation: {reason}")]
    SecurityViolation { reason: String },
}

/// What happened when an external process was started
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Process ran to completion
    Launched(CommandOutput),
    /// Process started but was killed after exceeding its timeout
    TimedOut { timeout_ms: u64 },
    /// Process could not be started; there is no exit status
    FailedToLaunch(CommandError),
}

impl ProcessOutcome {
    /// Only a launched process exiting with status 0 succeeds
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Launched(output) if output.success())
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessOutcome::Launched(output) => Some(output.exit_code),
            _ => None,
        }
    }
}

impl From<Result<CommandOutput, CommandError>> for ProcessOutcome {
    fn from(result: Result<CommandOutput, CommandError>) -> Self {
        match result {
            Ok(output) => ProcessOutcome::Launched(output),
            Err(CommandError::Timeout { timeout_ms, .. }) => ProcessOutcome::TimedOut { timeout_ms },
            Err(e) => ProcessOutcome::FailedToLaunch(e),
        }
    }
}
