//! Default deployment values
//!
//! These match the paths and identifiers used by the DetectX Jamf
//! workflow; every one of them can be overridden through `DetectxConfig`.

pub mod paths {
    /// DetectX Swift application bundle
    pub const SCANNER_APP: &str = "/Applications/Utilities/DetectX Swift.app";

    /// Output file for search results, read by the extension attributes
    pub const RESULTS_FILE: &str = "/Library/Application Support/JAMF/Addons/DetectX/results.json";

    /// Jamf binary used to run policies
    pub const JAMF_BINARY: &str = "/usr/local/bin/jamf";

    /// Used to read binary property lists
    pub const DEFAULTS_BINARY: &str = "/usr/bin/defaults";
}

pub mod bundle {
    /// Executable inside the app bundle
    pub const EXECUTABLE: &str = "Contents/MacOS/DetectX Swift";

    /// Bundle metadata inside the app bundle
    pub const INFO_PLIST: &str = "Contents/Info.plist";

    /// Key holding the build version
    pub const VERSION_KEY: &str = "CFBundleVersion";
}

pub mod scanner {
    /// Version 0.108 added single-user scanning, 0.110 scanning all login users
    pub const MINIMUM_VERSION: &str = "0.110";

    /// DetectX subcommand
    pub const SEARCH_COMMAND: &str = "search";

    /// All login users, JSON output to the following path
    pub const SEARCH_FLAGS: &str = "-aj";
}

pub mod policy {
    /// Custom trigger of the policy that installs DetectX
    pub const INSTALL_TRIGGER: &str = "install_detectx";
}

pub mod logging {
    pub const DEFAULT_LEVEL: &str = "warn";

    /// env_logger filter override
    pub const LOG_ENV_VAR: &str = "DETECTX_LOG";
}

/// Restricted PATH handed to child processes
pub const CHILD_PATH: &str = "/usr/bin:/bin:/usr/sbin:/sbin:/usr/local/bin";
