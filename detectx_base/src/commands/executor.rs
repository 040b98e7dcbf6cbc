//! Whitelisted execution of external programs (jamf, DetectX, defaults)

use super::{CommandError, CommandOutput, CommandRunner};
use crate::config::constants::CHILD_PATH;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Executes external programs with a whitelist and optional timeout
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor {
    allowed_programs: HashSet<PathBuf>,
}

impl SystemCommandExecutor {
    /// Create executor with empty whitelist - must be configured before use
    pub fn new() -> Self {
        Self::default()
    }

    /// Add program to whitelist
    pub fn allow_program(&mut self, program: impl Into<PathBuf>) {
        self.allowed_programs.insert(program.into());
    }

    /// Check if program is whitelisted
    pub fn is_allowed(&self, program: &Path) -> bool {
        self.allowed_programs.contains(program)
    }
}

impl CommandRunner for SystemCommandExecutor {
    fn execute(
        &self,
        program: &Path,
        args: &[&OsStr],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, CommandError> {
        let program_name = program.display().to_string();

        if !self.is_allowed(program) {
            return Err(CommandError::SecurityViolation {
                reason: format!("Program '{}' not in whitelist", program_name),
            });
        }

        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env_clear()
            .env("PATH", CHILD_PATH)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CommandError::ProgramNotFound {
                program: program_name.clone(),
            },
            std::io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                program: program_name.clone(),
            },
            _ => CommandError::ExecutionFailed {
                program: program_name.clone(),
                reason: e.to_string(),
            },
        })?;

        // Pipes are drained while waiting; a full pipe would stall the child
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = match timeout {
            Some(timeout_duration) => {
                let status = child
                    .wait_timeout(timeout_duration)
                    .map_err(|e| CommandError::ExecutionFailed {
                        program: program_name.clone(),
                        reason: e.to_string(),
                    })?;

                match status {
                    Some(status) => status,
                    None => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(CommandError::Timeout {
                            program: program_name,
                            timeout_ms: timeout_duration.as_millis() as u64,
                        });
                    }
                }
            }
            None => child.wait().map_err(|e| CommandError::ExecutionFailed {
                program: program_name.clone(),
                reason: e.to_string(),
            })?,
        };

        Ok(CommandOutput {
            stdout: collect_reader(stdout_reader),
            stderr: collect_reader(stderr_reader),
            exit_code: status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect_reader(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_whitelist() {
        let executor = SystemCommandExecutor::new();
        assert!(!executor.is_allowed(Path::new("/usr/local/bin/jamf")));
    }

    #[test]
    fn test_whitelist_management() {
        let mut executor = SystemCommandExecutor::new();

        executor.allow_program("/usr/local/bin/jamf");
        assert!(executor.is_allowed(Path::new("/usr/local/bin/jamf")));
        assert!(!executor.is_allowed(Path::new("jamf")));

        executor.allow_program(PathBuf::from("/usr/bin/defaults"));
        assert!(executor.is_allowed(Path::new("/usr/bin/defaults")));
    }

    #[test]
    fn test_security_violation() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute(Path::new("/bin/rm"), &[OsStr::new("-rf")], None);

        assert_matches!(result, Err(CommandError::SecurityViolation { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program() {
        let mut executor = SystemCommandExecutor::new();
        executor.allow_program("/nonexistent/detectx-test-binary");

        let result = executor.execute(Path::new("/nonexistent/detectx-test-binary"), &[], None);
        assert_matches!(result, Err(CommandError::ProgramNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_status_and_output() {
        let mut executor = SystemCommandExecutor::new();
        executor.allow_program("/bin/sh");

        let output = executor
            .execute(
                Path::new("/bin/sh"),
                &[OsStr::new("-c"), OsStr::new("echo out; echo err >&2; exit 3")],
                Some(Duration::from_secs(10)),
            )
            .unwrap();

        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let mut executor = SystemCommandExecutor::new();
        executor.allow_program("/bin/sh");

        let result = executor.execute(
            Path::new("/bin/sh"),
            &[OsStr::new("-c"), OsStr::new("sleep 5")],
            Some(Duration::from_millis(100)),
        );

        assert_matches!(result, Err(CommandError::Timeout { timeout_ms: 100, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_within_timeout() {
        let mut executor = SystemCommandExecutor::new();
        executor.allow_program("/bin/sh");

        let output = executor
            .execute(
                Path::new("/bin/sh"),
                &[
                    OsStr::new("-c"),
                    OsStr::new("head -c 200000 /dev/zero | tr '\\0' x; echo done >&2; exit 0"),
                ],
                Some(Duration::from_secs(10)),
            )
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.len(), 200000);
        assert!(output.stdout.bytes().all(|b| b == b'x'));
        assert_eq!(output.stderr.trim(), "done");
    }
}
