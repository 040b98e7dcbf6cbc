//! Event codes
//!
//! Every coded log line carries one of these so that Jamf policy logs can be
//! grepped for a specific failure class.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// Results file decoding
pub mod results {
    use super::Code;

    pub const RESULTS_FILE_MISSING: Code = Code::new("R001");
    pub const RESULTS_FILE_UNREADABLE: Code = Code::new("R002");
    pub const RESULTS_INVALID_JSON: Code = Code::new("R003");
    pub const RESULTS_NOT_AN_OBJECT: Code = Code::new("R004");
    pub const RESULTS_FIELD_MALFORMED: Code = Code::new("R005");
    pub const RESULTS_FIELD_ABSENT: Code = Code::new("R006");
}

/// Scanner bundle metadata
pub mod bundle {
    use super::Code;

    pub const SCANNER_NOT_FOUND: Code = Code::new("B001");
    pub const INFO_PLIST_MISSING: Code = Code::new("B002");
    pub const BUNDLE_VERSION_UNREADABLE: Code = Code::new("B003");
    pub const VERSION_BELOW_MINIMUM: Code = Code::new("B004");
}

/// Jamf policy execution
pub mod policy {
    use super::Code;

    pub const POLICY_FAILED: Code = Code::new("P001");
    pub const POLICY_LAUNCH_FAILED: Code = Code::new("P002");
    pub const SCANNER_STILL_MISSING: Code = Code::new("P003");
}

/// DetectX search execution
pub mod scan {
    use super::Code;

    pub const RESULTS_DIRECTORY_FAILED: Code = Code::new("S001");
    pub const SCAN_NONZERO_EXIT: Code = Code::new("S002");
    pub const SCAN_LAUNCH_FAILED: Code = Code::new("S003");
    pub const SCAN_TIMED_OUT: Code = Code::new("S004");
}

/// Configuration loading
pub mod config {
    use super::Code;

    pub const CONFIG_UNREADABLE: Code = Code::new("C001");
    pub const CONFIG_INVALID: Code = Code::new("C002");
    pub const ARGUMENTS_INVALID: Code = Code::new("C003");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const REPORT_GENERATED: Code = Code::new("I001");
    pub const SCANNER_INSTALLED: Code = Code::new("I002");
    pub const VERSION_ACCEPTED: Code = Code::new("I003");
    pub const SCAN_COMPLETE: Code = Code::new("I004");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(results::RESULTS_INVALID_JSON.to_string(), "R003");
        assert_eq!(scan::SCAN_LAUNCH_FAILED.as_str(), "S003");
    }
}
