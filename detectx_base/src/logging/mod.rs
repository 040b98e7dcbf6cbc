//! Coded, structured logging on top of the `log` facade
//!
//! The binaries install an `env_logger` backend that writes to standard
//! error; standard output is reserved for extension attribute results and
//! the messages Jamf shows in policy logs.

pub mod codes;
pub mod macros;

pub use codes::Code;
pub use log::{Level, LevelFilter};

/// Render a log line as `[CODE] message key=value key=value`
pub fn format_event(code: Option<Code>, message: &str, context: &[(&str, &str)]) -> String {
    let mut line = match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    };

    for (key, value) in context {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        if value.contains(char::is_whitespace) {
            line.push_str(&format!("{:?}", value));
        } else {
            line.push_str(value);
        }
    }

    line
}

/// Emit an event at `level` (used by the logging macros)
pub fn log_with_context(level: Level, code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    if log::log_enabled!(level) {
        log::log!(level, "{}", format_event(code, message, &context));
    }
}

/// Parse a level name as accepted in configuration files
pub fn parse_level_filter(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}
