//! # Extension Attribute Reporter
//!
//! Produces the single `<result>...</result>` line Jamf collects from an
//! extension attribute. Never fails: errors reading the results file are
//! logged and reported as "no findings".

use super::types::{FieldState, ReportField, ScanResults};
use crate::config::DetectxConfig;
use crate::logging::codes;
use crate::{log_debug, log_success, log_warning};
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of reading the results file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Results file does not exist; no search has run yet
    NotRun,
    /// File exists but lists nothing (or could not be decoded)
    NoFindings,
    /// Detected paths in file order
    Findings(Vec<String>),
}

impl Report {
    /// Text placed between the result tags
    pub fn value(&self) -> String {
        match self {
            Report::NotRun => String::new(),
            Report::NoFindings => "None".to_string(),
            Report::Findings(items) => items.join("\n"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<result>{}</result>", self.value())
    }
}

pub struct ResultReporter {
    results_file: PathBuf,
    field: ReportField,
}

impl ResultReporter {
    pub fn new(results_file: impl Into<PathBuf>, field: ReportField) -> Self {
        Self {
            results_file: results_file.into(),
            field,
        }
    }

    pub fn from_config(config: &DetectxConfig, field: ReportField) -> Self {
        Self::new(config.results_file.clone(), field)
    }

    pub fn results_file(&self) -> &Path {
        &self.results_file
    }

    pub fn field(&self) -> ReportField {
        self.field
    }

    pub fn report(&self) -> Report {
        if !self.results_file.exists() {
            log_debug!(
                "Results file not present",
                "path" => self.results_file.display()
            );
            return Report::NotRun;
        }

        let items = match ScanResults::load(&self.results_file) {
            Ok(results) => {
                if results.field(self.field) == &FieldState::Absent {
                    log_debug!(
                        "Results field absent",
                        "code" => codes::results::RESULTS_FIELD_ABSENT,
                        "field" => self.field
                    );
                }
                match results.checked_items(self.field) {
                    Ok(items) => items.to_vec(),
                    Err(e) => {
                        log_warning!(
                            e.code(),
                            "Results field ignored",
                            "path" => self.results_file.display(),
                            "error" => e
                        );
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                log_warning!(
                    e.code(),
                    "Results file could not be decoded",
                    "path" => self.results_file.display(),
                    "error" => e
                );
                Vec::new()
            }
        };

        let report = if items.is_empty() {
            Report::NoFindings
        } else {
            Report::Findings(items)
        };

        log_success!(
            codes::success::REPORT_GENERATED,
            "Extension attribute generated",
            "field" => self.field,
            "count" => match &report {
                Report::Findings(items) => items.len(),
                _ => 0,
            }
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_results(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("results.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_findings_joined_by_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_results(
            &dir,
            &json!({
                "infections": [
                    "/Library/LaunchDaemons/com.machelper.plist",
                    "/Users/jo/Library/Application Support/mh/mh"
                ]
            })
            .to_string(),
        );

        let report = ResultReporter::new(&path, ReportField::Infections).report();
        assert_eq!(
            report.to_string(),
            "<result>/Library/LaunchDaemons/com.machelper.plist\n/Users/jo/Library/Application Support/mh/mh</result>"
        );
    }

    #[test]
    fn test_issues_variant_reads_issues() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_results(
            &dir,
            &json!({ "infections": ["/tmp/infected"], "issues": ["/tmp/issue"] }).to_string(),
        );

        let report = ResultReporter::new(&path, ReportField::Issues).report();
        assert_eq!(report, Report::Findings(vec!["/tmp/issue".to_string()]));
        assert_eq!(report.to_string(), "<result>/tmp/issue</result>");
    }

    #[test]
    fn test_empty_and_absent_lists_report_none() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_results(&dir, r#"{"infections": []}"#);
        let reporter = ResultReporter::new(&path, ReportField::Infections);
        assert_eq!(reporter.report().to_string(), "<result>None</result>");

        let path = write_results(&dir, r#"{"issues": ["/tmp/issue"]}"#);
        let reporter = ResultReporter::new(&path, ReportField::Infections);
        assert_eq!(reporter.report().to_string(), "<result>None</result>");
    }

    #[test]
    fn test_missing_file_reports_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = ResultReporter::new(dir.path().join("results.json"), ReportField::Infections);

        assert_eq!(reporter.report(), Report::NotRun);
        assert_eq!(reporter.report().to_string(), "<result></result>");
    }

    #[test]
    fn test_invalid_json_reports_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_results(&dir, "{\"infections\": [\"/tmp/half-writ");

        let report = ResultReporter::new(&path, ReportField::Infections).report();
        assert_eq!(report.to_string(), "<result>None</result>");
    }

    #[test]
    fn test_non_object_and_malformed_report_none() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_results(&dir, r#"["/tmp/a"]"#);
        assert_eq!(
            ResultReporter::new(&path, ReportField::Issues).report(),
            Report::NoFindings
        );

        let path = write_results(&dir, r#"{"issues": {"path": "/tmp/a"}}"#);
        assert_eq!(
            ResultReporter::new(&path, ReportField::Issues).report(),
            Report::NoFindings
        );
    }

    #[test]
    fn test_from_config_uses_results_file() {
        let config = DetectxConfig::default();
        let reporter = ResultReporter::from_config(&config, ReportField::Issues);
        assert_eq!(reporter.results_file(), config.results_file.as_path());
        assert_eq!(reporter.field(), ReportField::Issues);
    }
}
