//! # Jamf Policy Runner
//!
//! Runs `jamf policy` by custom event trigger or by policy id.

use crate::commands::{CommandError, CommandRunner};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Selects which policy jamf runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyIdentifier {
    /// Custom event trigger, `jamf policy -event <name>`
    Event(String),
    /// Policy id, `jamf policy -id <n>`
    Id(u32),
}

impl PolicyIdentifier {
    fn args(&self) -> Vec<OsString> {
        match self {
            PolicyIdentifier::Event(name) => vec!["policy".into(), "-event".into(), name.into()],
            PolicyIdentifier::Id(id) => vec!["policy".into(), "-id".into(), id.to_string().into()],
        }
    }
}

impl fmt::Display for PolicyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyIdentifier::Event(name) => write!(f, "{}", name),
            PolicyIdentifier::Id(id) => write!(f, "id {}", id),
        }
    }
}

impl From<&str> for PolicyIdentifier {
    fn from(name: &str) -> Self {
        PolicyIdentifier::Event(name.to_string())
    }
}

impl From<u32> for PolicyIdentifier {
    fn from(id: u32) -> Self {
        PolicyIdentifier::Id(id)
    }
}

/// Captured result of a policy run that launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyResult {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
    pub success: bool,
}

/// Policy runs that never produced a status
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("jamf could not be launched: {0}")]
    Launch(#[source] CommandError),

    #[error("jamf policy '{policy}' timed out after {timeout_ms}ms")]
    TimedOut { policy: String, timeout_ms: u64 },
}

pub struct PolicyRunner {
    runner: Arc<dyn CommandRunner>,
    jamf_binary: PathBuf,
    timeout: Option<Duration>,
}

impl PolicyRunner {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        jamf_binary: impl Into<PathBuf>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            runner,
            jamf_binary: jamf_binary.into(),
            timeout,
        }
    }

    /// Run a policy and wait for it to finish
    pub fn run(&self, policy: &PolicyIdentifier) -> Result<PolicyResult, PolicyError> {
        let args = policy.args();
        let arg_refs: Vec<&OsStr> = args.iter().map(|a| a.as_os_str()).collect();

        match self.runner.execute(&self.jamf_binary, &arg_refs, self.timeout) {
            Ok(output) => Ok(PolicyResult {
                success: output.success(),
                status: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            Err(CommandError::Timeout { timeout_ms, .. }) => Err(PolicyError::TimedOut {
                policy: policy.to_string(),
                timeout_ms,
            }),
            Err(e) => Err(PolicyError::Launch(e)),
        }
    }
}
