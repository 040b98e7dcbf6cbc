//! # Orchestrator Errors
//!
//! Display strings are the messages printed to Jamf policy logs.

use crate::bundle::BundleError;
use crate::commands::ProcessOutcome;
use crate::config::ConfigError;
use crate::logging::{codes, Code};
use crate::policy::PolicyError;
use std::path::PathBuf;

/// Why the scanner could not be installed through Jamf
#[derive(Debug, thiserror::Error)]
pub enum InstallFailure {
    #[error("policy exited with status {status}")]
    PolicyFailed { status: i32 },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("policy succeeded but the app bundle is still missing")]
    StillMissing,
}

/// Fatal conditions of an orchestration run
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("DetectX was not found at path '{}' and could not be installed via Jamf trigger '{trigger}'", .app_path.display())]
    ScannerUnavailable {
        app_path: PathBuf,
        trigger: String,
        #[source]
        cause: InstallFailure,
    },

    #[error("The installed version of DetectX does not meet the minimum required version {minimum}.")]
    VersionTooLow {
        minimum: String,
        /// Installed version, when one could be read
        installed: Option<String>,
        /// Set when the version could not be read at all
        #[source]
        cause: Option<BundleError>,
    },

    #[error("Could not create results directory '{}': {source}", .path.display())]
    ResultsDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during the DetectX search.")]
    ScanFailed { outcome: ProcessOutcome },
}

impl OrchestratorError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn code(&self) -> Code {
        match self {
            OrchestratorError::Config(e) => e.code(),
            OrchestratorError::ScannerUnavailable { cause, .. } => match cause {
                InstallFailure::PolicyFailed { .. } => codes::policy::POLICY_FAILED,
                InstallFailure::Policy(_) => codes::policy::POLICY_LAUNCH_FAILED,
                InstallFailure::StillMissing => codes::policy::SCANNER_STILL_MISSING,
            },
            OrchestratorError::VersionTooLow { cause: Some(e), .. } => e.code(),
            OrchestratorError::VersionTooLow { cause: None, .. } => {
                codes::bundle::VERSION_BELOW_MINIMUM
            }
            OrchestratorError::ResultsDirectory { .. } => codes::scan::RESULTS_DIRECTORY_FAILED,
            OrchestratorError::ScanFailed { outcome } => match outcome {
                ProcessOutcome::Launched(_) => codes::scan::SCAN_NONZERO_EXIT,
                ProcessOutcome::TimedOut { .. } => codes::scan::SCAN_TIMED_OUT,
                ProcessOutcome::FailedToLaunch(_) => codes::scan::SCAN_LAUNCH_FAILED,
            },
        }
    }
}
