// results/error.rs

use crate::logging::codes;
use crate::logging::Code;
use std::path::PathBuf;

/// Reasons a results file yields no usable item list
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("Results file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read results file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Results file '{}' is not valid JSON: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Results document is a JSON {found}, expected an object")]
    NotAnObject { found: &'static str },

    #[error("Field '{field}' is not an array of strings")]
    MalformedField { field: &'static str },
}

impl ResultsError {
    /// Event code logged when a reporter downgrades this error to "no findings"
    pub fn code(&self) -> Code {
        match self {
            ResultsError::NotFound { .. } => codes::results::RESULTS_FILE_MISSING,
            ResultsError::Io { .. } => codes::results::RESULTS_FILE_UNREADABLE,
            ResultsError::InvalidJson { .. } => codes::results::RESULTS_INVALID_JSON,
            ResultsError::NotAnObject { .. } => codes::results::RESULTS_NOT_AN_OBJECT,
            ResultsError::MalformedField { .. } => codes::results::RESULTS_FIELD_MALFORMED,
        }
    }
}
