//! Jamf extension attribute: infections found by the last DetectX search
//!
//! `<result></result>` when no search has run, `<result>None</result>` when
//! nothing was found, otherwise one infected path per line.

use detectx_base::ReportField;

fn main() {
    detectx_sdk::run_reporter(ReportField::Infections);
}
