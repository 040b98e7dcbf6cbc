//! # DetectX Search Runner
//!
//! Jamf policy script: installs DetectX Swift through a policy trigger if
//! needed, checks its version and runs a search for all login users.
//! Exits 0 on success and 1 on any failure.

use clap::Parser;
use detectx_base::logging::LevelFilter;
use detectx_base::{log_error, log_info, DetectxConfig, ScanOrchestrator};
use detectx_sdk::cli::{parse_exit_status, SearchCli};
use detectx_sdk::commands::create_macos_command_executor;
use detectx_sdk::{effective_level, init_logging};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = match SearchCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_exit_status(&e));
        }
    };

    let config = match DetectxConfig::resolve(cli.common.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LevelFilter::Warn);
            log_error!(e.code(), "Configuration rejected", "error" => &e);
            println!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };

    init_logging(effective_level(&config, cli.common.verbose));
    log_info!(
        "DetectX search runner starting",
        "version" => env!("CARGO_PKG_VERSION"),
        "ignored_parameters" => cli.common.jamf_parameters.len()
    );

    let executor = create_macos_command_executor(&config);
    let orchestrator = ScanOrchestrator::new(config, Arc::new(executor));

    let mut stdout = std::io::stdout();
    match orchestrator.run(&mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code() as u8),
    }
}
