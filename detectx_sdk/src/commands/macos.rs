//! macOS command executor configuration
//!
//! Whitelists exactly the programs the search runner launches.

use detectx_base::commands::SystemCommandExecutor;
use detectx_base::config::constants;
use detectx_base::DetectxConfig;

/// Create command executor for a DetectX search run
///
/// Whitelist includes:
/// - the configured jamf binary: install policy
/// - the DetectX Swift executable inside the configured bundle: search
/// - /usr/bin/defaults: reading binary Info.plist files
pub fn create_macos_command_executor(config: &DetectxConfig) -> SystemCommandExecutor {
    let mut executor = SystemCommandExecutor::new();

    executor.allow_program(config.jamf_binary.clone());
    executor.allow_program(config.scanner_executable());
    executor.allow_program(constants::paths::DEFAULTS_BINARY);

    executor
}
