//! # DetectX Base
//!
//! Core of the DetectX Jamf tooling: reads DetectX Swift result files for
//! extension attributes, and orchestrates installation, version checking
//! and execution of DetectX searches.

pub mod bundle;
pub mod commands;
pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod policy;
pub mod results;
pub mod version;

// Convenience re-exports
pub use config::DetectxConfig;
pub use orchestrator::{OrchestratorError, ScanOrchestrator, ScanSummary};
pub use results::{Report, ReportField, ResultReporter, ScanResults};

pub mod prelude {
    pub use crate::bundle::{BundleError, ScannerBundle};
    pub use crate::commands::{
        CommandError, CommandOutput, CommandRunner, ProcessOutcome, SystemCommandExecutor,
    };
    pub use crate::config::{ConfigError, DetectxConfig};
    pub use crate::orchestrator::{OrchestratorError, ScanOrchestrator, ScanSummary};
    pub use crate::policy::{PolicyError, PolicyIdentifier, PolicyResult, PolicyRunner};
    pub use crate::results::{Report, ReportField, ResultReporter, ResultsError, ScanResults};
    pub use crate::version::BundleVersion;
}
