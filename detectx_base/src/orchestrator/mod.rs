//! # Scan Orchestrator
//!
//! Makes sure DetectX Swift is installed and recent enough, then runs an
//! all-users JSON search into the configured results file.
//!
//! A failed run leaves any previous results file untouched, so extension
//! attributes keep reporting the last successful search.

pub mod error;

pub use error::{InstallFailure, OrchestratorError};

use crate::bundle::ScannerBundle;
use crate::commands::{CommandRunner, ProcessOutcome};
use crate::config::{constants, DetectxConfig};
use crate::logging::codes;
use crate::policy::{PolicyIdentifier, PolicyRunner};
use crate::version::BundleVersion;
use crate::{log_error, log_info, log_success, log_warning};
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Whether DetectX had to be installed through the Jamf policy
    pub installed_via_policy: bool,
    pub scanner_version: String,
    pub results_file: PathBuf,
    pub duration: Duration,
}

pub struct ScanOrchestrator {
    config: DetectxConfig,
    runner: Arc<dyn CommandRunner>,
    bundle: ScannerBundle,
    policy: PolicyRunner,
}

impl ScanOrchestrator {
    pub fn new(config: DetectxConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let bundle = ScannerBundle::new(config.scanner_app.clone());
        let policy = PolicyRunner::new(
            runner.clone(),
            config.jamf_binary.clone(),
            config.policy_timeout(),
        );

        Self {
            config,
            runner,
            bundle,
            policy,
        }
    }

    pub fn config(&self) -> &DetectxConfig {
        &self.config
    }

    /// Run the full workflow. Progress notices and the final outcome line
    /// go to `out`; the caller maps the result to an exit status.
    pub fn run(&self, out: &mut dyn Write) -> Result<ScanSummary, OrchestratorError> {
        let result = self.run_steps(out);

        match &result {
            Ok(summary) => {
                let _ = writeln!(out, "DetectX search complete.");
                let _ = writeln!(
                    out,
                    "Results available at {}",
                    summary.results_file.display()
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{}", e);
            }
        }

        result
    }

    fn run_steps(&self, out: &mut dyn Write) -> Result<ScanSummary, OrchestratorError> {
        let start = Instant::now();

        let installed_via_policy = self.ensure_installed()?;
        if installed_via_policy {
            let _ = writeln!(
                out,
                "DetectX was installed via Jamf trigger '{}'",
                self.config.policy_trigger
            );
        }

        let version = self.check_version()?;
        self.prepare_results_directory()?;

        let outcome = self.run_search();
        if !outcome.is_success() {
            return Err(self.scan_failure(outcome));
        }

        let duration = start.elapsed();
        log_success!(
            codes::success::SCAN_COMPLETE,
            "DetectX search complete",
            "results_file" => self.config.results_file.display(),
            "duration_ms" => duration.as_millis()
        );

        Ok(ScanSummary {
            installed_via_policy,
            scanner_version: version.to_string(),
            results_file: self.config.results_file.clone(),
            duration,
        })
    }

    /// Returns true when the policy had to install DetectX
    pub fn ensure_installed(&self) -> Result<bool, OrchestratorError> {
        if self.bundle.exists() {
            return Ok(false);
        }

        log_warning!(
            codes::bundle::SCANNER_NOT_FOUND,
            "DetectX not found, running install policy",
            "path" => self.bundle.app_path().display(),
            "trigger" => &self.config.policy_trigger
        );

        let policy = PolicyIdentifier::Event(self.config.policy_trigger.clone());
        let cause = match self.policy.run(&policy) {
            Ok(result) if !result.success => Some(InstallFailure::PolicyFailed {
                status: result.status,
            }),
            Ok(_) if !self.bundle.exists() => Some(InstallFailure::StillMissing),
            Ok(_) => None,
            Err(e) => Some(InstallFailure::from(e)),
        };

        if let Some(cause) = cause {
            let err = OrchestratorError::ScannerUnavailable {
                app_path: self.config.scanner_app.clone(),
                trigger: self.config.policy_trigger.clone(),
                cause,
            };
            log_error!(err.code(), "DetectX install failed", "error" => &err);
            return Err(err);
        }

        log_success!(
            codes::success::SCANNER_INSTALLED,
            "DetectX installed via Jamf policy",
            "trigger" => &self.config.policy_trigger
        );
        Ok(true)
    }

    /// Read the installed version and compare it with the configured minimum
    pub fn check_version(&self) -> Result<BundleVersion, OrchestratorError> {
        let minimum = BundleVersion::parse(&self.config.minimum_version).ok_or_else(|| {
            crate::config::ConfigError::Invalid {
                field: "minimum_version",
                reason: format!("'{}' is not a version", self.config.minimum_version),
            }
        })?;

        let installed = match self.bundle.read_version_with(self.runner.as_ref()) {
            Ok(version) => version,
            Err(e) => {
                log_error!(
                    e.code(),
                    "Could not read DetectX version",
                    "error" => &e
                );
                return Err(OrchestratorError::VersionTooLow {
                    minimum: self.config.minimum_version.clone(),
                    installed: None,
                    cause: Some(e),
                });
            }
        };

        if !installed.meets_minimum(&minimum) {
            log_error!(
                codes::bundle::VERSION_BELOW_MINIMUM,
                "DetectX version below minimum",
                "installed" => &installed,
                "minimum" => &minimum
            );
            return Err(OrchestratorError::VersionTooLow {
                minimum: self.config.minimum_version.clone(),
                installed: Some(installed.to_string()),
                cause: None,
            });
        }

        log_success!(
            codes::success::VERSION_ACCEPTED,
            "DetectX version accepted",
            "installed" => &installed,
            "minimum" => &minimum
        );
        Ok(installed)
    }

    /// Create the results directory and its ancestors if missing
    pub fn prepare_results_directory(&self) -> Result<(), OrchestratorError> {
        let Some(directory) = self.config.results_directory() else {
            return Ok(());
        };

        std::fs::create_dir_all(directory).map_err(|source| {
            OrchestratorError::ResultsDirectory {
                path: directory.to_path_buf(),
                source,
            }
        })
    }

    /// Launch `DetectX Swift search -aj <results>` and wait for it
    pub fn run_search(&self) -> ProcessOutcome {
        let executable = self.bundle.executable_path();
        let args = [
            OsStr::new(constants::scanner::SEARCH_COMMAND),
            OsStr::new(constants::scanner::SEARCH_FLAGS),
            self.config.results_file.as_os_str(),
        ];

        log_info!(
            "Running DetectX search",
            "executable" => executable.display(),
            "results_file" => self.config.results_file.display()
        );

        ProcessOutcome::from(
            self.runner
                .execute(&executable, &args, self.config.scan_timeout()),
        )
    }

    fn scan_failure(&self, outcome: ProcessOutcome) -> OrchestratorError {
        match &outcome {
            ProcessOutcome::Launched(output) => log_error!(
                codes::scan::SCAN_NONZERO_EXIT,
                "DetectX search exited with failure",
                "exit_code" => output.exit_code,
                "stderr" => output.stderr.trim()
            ),
            ProcessOutcome::TimedOut { timeout_ms } => log_error!(
                codes::scan::SCAN_TIMED_OUT,
                "DetectX search timed out",
                "timeout_ms" => timeout_ms
            ),
            ProcessOutcome::FailedToLaunch(e) => log_error!(
                codes::scan::SCAN_LAUNCH_FAILED,
                "DetectX search could not be launched",
                "error" => e
            ),
        }

        OrchestratorError::ScanFailed { outcome }
    }
}
