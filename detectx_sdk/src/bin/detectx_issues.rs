//! Jamf extension attribute: issues found by the last DetectX search
//!
//! `<result></result>` when no search has run, `<result>None</result>` when
//! nothing was found, otherwise one path per line.

use detectx_base::ReportField;

fn main() {
    detectx_sdk::run_reporter(ReportField::Issues);
}
