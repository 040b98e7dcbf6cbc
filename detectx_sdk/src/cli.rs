use clap::error::ErrorKind;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, value_name = "FILE", help = "TOML configuration overriding the built-in defaults")]
    pub config: Option<PathBuf>,
    #[arg(short, long, help = "Log debug detail to standard error")]
    pub verbose: bool,
    /// Jamf passes mount point, computer name, user name and script
    /// parameters positionally; they are accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true)]
    pub jamf_parameters: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "run-detectx-search",
    version,
    about = "Install (if needed) and run a DetectX Swift search for all login users"
)]
pub struct SearchCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "detectx-report",
    version,
    about = "Jamf extension attribute reporting DetectX findings"
)]
pub struct ReportCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Exit status after clap rejects or answers a command line. Help and
/// version requests succeed; every other error is a plain failure (1).
pub fn parse_exit_status(error: &clap::Error) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
