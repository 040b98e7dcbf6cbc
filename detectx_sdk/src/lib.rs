//! # DetectX SDK
//!
//! Jamf-facing programs built on `detectx_base`: the two extension
//! attributes and the search runner.

pub mod cli;
pub mod commands;

use clap::Parser;
use detectx_base::config::constants;
use detectx_base::logging::{codes, LevelFilter};
use detectx_base::{log_warning, DetectxConfig, ReportField, ResultReporter};

/// Install the env_logger backend; `DETECTX_LOG` filters take precedence
pub fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr);

    if let Ok(filters) = std::env::var(constants::logging::LOG_ENV_VAR) {
        builder.parse_filters(&filters);
    }

    let _ = builder.try_init();
}

/// Level after applying `--verbose`
pub fn effective_level(config: &DetectxConfig, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    }
}

/// Extension attribute entry point
///
/// Always prints exactly one `<result>` line; argument and configuration
/// problems are logged and the defaults, plus any usable `DETECTX_*`
/// overrides, are used instead.
pub fn run_reporter(field: ReportField) {
    let (common, arg_error) = match cli::ReportCli::try_parse() {
        Ok(cli) => (cli.common, None),
        Err(e) if cli::parse_exit_status(&e) == 0 => e.exit(),
        Err(e) => (cli::CommonArgs::default(), Some(e)),
    };

    let (config, config_error) = match DetectxConfig::resolve(common.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (DetectxConfig::fallback(), Some(e)),
    };

    init_logging(effective_level(&config, common.verbose));

    if let Some(e) = arg_error {
        log_warning!(
            codes::config::ARGUMENTS_INVALID,
            "Ignoring command-line arguments",
            "error" => format!("{:?}", e.kind())
        );
    }
    if let Some(e) = config_error {
        log_warning!(
            e.code(),
            "Using default configuration with environment overrides",
            "error" => e
        );
    }

    println!("{}", ResultReporter::from_config(&config, field).report());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        let config = DetectxConfig::default();
        assert_eq!(effective_level(&config, false), LevelFilter::Warn);
        assert_eq!(effective_level(&config, true), LevelFilter::Debug);

        let config = DetectxConfig {
            log_level: "error".to_string(),
            ..DetectxConfig::default()
        };
        assert_eq!(effective_level(&config, false), LevelFilter::Error);
    }
}
