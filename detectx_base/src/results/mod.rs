//! # Results
//!
//! Decoding of DetectX results files and the extension attribute contract.

pub mod error;
pub mod reporter;
pub mod types;

pub use error::ResultsError;
pub use reporter::{Report, ResultReporter};
pub use types::{FieldState, ReportField, ScanResults};
