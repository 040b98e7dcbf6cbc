//! Command execution configurations
//!
//! Provides whitelisted command executors for the search runner.

pub mod macos;

pub use macos::create_macos_command_executor;
