//! # Results File Types
//!
//! DetectX writes `{"infections": [...], "issues": [...]}`; either key may
//! be missing. Fields decode independently so that a malformed `issues`
//! value never hides `infections`.

use super::error::ResultsError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Which list an extension attribute reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Infections,
    Issues,
}

impl ReportField {
    /// Key in the results document
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportField::Infections => "infections",
            ReportField::Issues => "issues",
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded state of one results field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Absent,
    Items(Vec<String>),
    /// Present but not an array of strings
    Malformed,
}

impl<'de> Deserialize<'de> for FieldState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let state = match value {
            Value::Array(entries) => entries
                .into_iter()
                .map(|entry| match entry {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect::<Option<Vec<String>>>()
                .map(FieldState::Items)
                .unwrap_or(FieldState::Malformed),
            _ => FieldState::Malformed,
        };
        Ok(state)
    }
}

/// Contents of a DetectX results file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScanResults {
    #[serde(default)]
    pub infections: FieldState,
    #[serde(default)]
    pub issues: FieldState,
}

impl ScanResults {
    /// Read and decode a results file
    pub fn load(path: &Path) -> Result<Self, ResultsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ResultsError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ResultsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let value: Value =
            serde_json::from_str(&contents).map_err(|source| ResultsError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_value(value).map_err(|e| match e {
            ResultsError::InvalidJson { source, .. } => ResultsError::InvalidJson {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Decode an already parsed document; the top level must be an object
    pub fn from_value(value: Value) -> Result<Self, ResultsError> {
        let found = match &value {
            Value::Object(_) => None,
            Value::Null => Some("null"),
            Value::Bool(_) => Some("boolean"),
            Value::Number(_) => Some("number"),
            Value::String(_) => Some("string"),
            Value::Array(_) => Some("array"),
        };
        if let Some(found) = found {
            return Err(ResultsError::NotAnObject { found });
        }

        serde_json::from_value(value).map_err(|source| ResultsError::InvalidJson {
            path: Default::default(),
            source,
        })
    }

    pub fn field(&self, field: ReportField) -> &FieldState {
        match field {
            ReportField::Infections => &self.infections,
            ReportField::Issues => &self.issues,
        }
    }

    /// Items of `field`; empty when absent or malformed
    pub fn items(&self, field: ReportField) -> &[String] {
        match self.field(field) {
            FieldState::Items(items) => items,
            FieldState::Absent | FieldState::Malformed => &[],
        }
    }

    /// Items, or an error if the field is present but malformed
    pub fn checked_items(&self, field: ReportField) -> Result<&[String], ResultsError> {
        match self.field(field) {
            FieldState::Malformed => Err(ResultsError::MalformedField {
                field: field.as_str(),
            }),
            _ => Ok(self.items(field)),
        }
    }
}
