//! # DetectX Configuration
//!
//! Paths, version requirements and identifiers used by the reporters and the
//! orchestrator. Values are resolved from defaults, then an optional TOML
//! file, then `DETECTX_*` environment variables.

pub mod constants;

use crate::logging::{codes, parse_level_filter, Code, LevelFilter};
use crate::version::BundleVersion;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> Code {
        match self {
            ConfigError::Io { .. } => codes::config::CONFIG_UNREADABLE,
            ConfigError::Parse { .. } | ConfigError::Invalid { .. } => codes::config::CONFIG_INVALID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectxConfig {
    /// DetectX Swift application bundle
    pub scanner_app: PathBuf,

    /// Where searches write results and reporters read them
    pub results_file: PathBuf,

    /// Lowest acceptable CFBundleVersion
    pub minimum_version: String,

    /// Jamf custom trigger that installs DetectX
    pub policy_trigger: String,

    pub jamf_binary: PathBuf,

    /// None waits for the search indefinitely
    pub scan_timeout_secs: Option<u64>,

    /// None waits for the policy indefinitely
    pub policy_timeout_secs: Option<u64>,

    pub log_level: String,
}

impl Default for DetectxConfig {
    fn default() -> Self {
        Self {
            scanner_app: PathBuf::from(constants::paths::SCANNER_APP),
            results_file: PathBuf::from(constants::paths::RESULTS_FILE),
            minimum_version: constants::scanner::MINIMUM_VERSION.to_string(),
            policy_trigger: constants::policy::INSTALL_TRIGGER.to_string(),
            jamf_binary: PathBuf::from(constants::paths::JAMF_BINARY),
            scan_timeout_secs: None,
            policy_timeout_secs: None,
            log_level: constants::logging::DEFAULT_LEVEL.to_string(),
        }
    }
}

impl DetectxConfig {
    /// Load a TOML configuration file; unspecified keys keep their defaults
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Defaults, optional file, environment overrides, then validation
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };

        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for callers that must keep going
    /// after `resolve` fails. Overrides are dropped if any of them is unusable.
    pub fn fallback() -> Self {
        Self::fallback_with_overrides(|key| env::var(key).ok())
    }

    pub fn fallback_with_overrides<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup).unwrap_or_default()
    }

    /// Apply `DETECTX_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup keyed by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DETECTX_SCANNER_APP") {
            self.scanner_app = PathBuf::from(value);
        }
        if let Some(value) = lookup("DETECTX_RESULTS_FILE") {
            self.results_file = PathBuf::from(value);
        }
        if let Some(value) = lookup("DETECTX_MINIMUM_VERSION") {
            self.minimum_version = value;
        }
        if let Some(value) = lookup("DETECTX_POLICY_TRIGGER") {
            self.policy_trigger = value;
        }
        if let Some(value) = lookup("DETECTX_JAMF_BINARY") {
            self.jamf_binary = PathBuf::from(value);
        }
        if let Some(value) = lookup("DETECTX_SCAN_TIMEOUT_SECS") {
            self.scan_timeout_secs = Some(parse_secs("scan_timeout_secs", &value)?);
        }
        if let Some(value) = lookup("DETECTX_POLICY_TIMEOUT_SECS") {
            self.policy_timeout_secs = Some(parse_secs("policy_timeout_secs", &value)?);
        }
        if let Some(value) = lookup("DETECTX_LOG_LEVEL") {
            self.log_level = value;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, path) in [
            ("scanner_app", &self.scanner_app),
            ("results_file", &self.results_file),
            ("jamf_binary", &self.jamf_binary),
        ] {
            if !path.is_absolute() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("'{}' is not an absolute path", path.display()),
                });
            }
        }

        if self.results_file.parent().is_none() {
            return Err(ConfigError::Invalid {
                field: "results_file",
                reason: "path has no parent directory".to_string(),
            });
        }

        if BundleVersion::parse(&self.minimum_version).is_none() {
            return Err(ConfigError::Invalid {
                field: "minimum_version",
                reason: format!("'{}' is not a version", self.minimum_version),
            });
        }

        if self.policy_trigger.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "policy_trigger",
                reason: "trigger must not be empty".to_string(),
            });
        }

        for (field, secs) in [
            ("scan_timeout_secs", self.scan_timeout_secs),
            ("policy_timeout_secs", self.policy_timeout_secs),
        ] {
            if secs == Some(0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
        }

        if parse_level_filter(&self.log_level).is_none() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!("unknown level '{}'", self.log_level),
            });
        }

        Ok(())
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs.map(Duration::from_secs)
    }

    pub fn policy_timeout(&self) -> Option<Duration> {
        self.policy_timeout_secs.map(Duration::from_secs)
    }

    /// Falls back to the default level when the configured name is unknown
    pub fn log_level_filter(&self) -> LevelFilter {
        parse_level_filter(&self.log_level).unwrap_or(LevelFilter::Warn)
    }

    /// Full path of the DetectX executable
    pub fn scanner_executable(&self) -> PathBuf {
        self.scanner_app.join(constants::bundle::EXECUTABLE)
    }

    /// Directory that must exist before a search can write results
    pub fn results_directory(&self) -> Option<&Path> {
        self.results_file.parent()
    }
}

fn parse_secs(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        field,
        reason: format!("'{}' is not a number of seconds", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DetectxConfig::default();
        assert_eq!(
            config.scanner_app,
            PathBuf::from("/Applications/Utilities/DetectX Swift.app")
        );
        assert_eq!(
            config.results_file,
            PathBuf::from("/Library/Application Support/JAMF/Addons/DetectX/results.json")
        );
        assert_eq!(config.minimum_version, "0.110");
        assert_eq!(config.policy_trigger, "install_detectx");
        assert!(config.scan_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scanner_paths() {
        let config = DetectxConfig::default();
        assert_eq!(
            config.scanner_executable(),
            PathBuf::from("/Applications/Utilities/DetectX Swift.app/Contents/MacOS/DetectX Swift")
        );
        assert_eq!(
            config.results_directory(),
            Some(Path::new("/Library/Application Support/JAMF/Addons/DetectX"))
        );
    }

    #[test]
    fn test_load_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detectx.toml");
        std::fs::write(
            &path,
            "minimum_version = \"0.120\"\nscan_timeout_secs = 3600\n",
        )
        .unwrap();

        let config = DetectxConfig::load_file(&path).unwrap();
        assert_eq!(config.minimum_version, "0.120");
        assert_eq!(config.scan_timeout(), Some(Duration::from_secs(3600)));
        assert_eq!(config.policy_trigger, "install_detectx");
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detectx.toml");
        std::fs::write(&path, "minimum_versoin = \"0.120\"\n").unwrap();

        assert_matches!(
            DetectxConfig::load_file(&path),
            Err(ConfigError::Parse { .. })
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            DetectxConfig::load_file(&dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DETECTX_POLICY_TRIGGER", "detectx_latest"),
            ("DETECTX_POLICY_TIMEOUT_SECS", "600"),
            ("DETECTX_RESULTS_FILE", "/tmp/detectx/results.json"),
        ]
        .into_iter()
        .collect();

        let config = DetectxConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.policy_trigger, "detectx_latest");
        assert_eq!(config.policy_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.results_file, PathBuf::from("/tmp/detectx/results.json"));
    }

    #[test]
    fn test_fallback_keeps_usable_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DETECTX_RESULTS_FILE", "/tmp/detectx/results.json"),
            ("DETECTX_LOG_LEVEL", "loud"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());

        let err = DetectxConfig::default()
            .with_overrides(lookup)
            .unwrap()
            .validate()
            .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { field: "log_level", .. });

        let config = DetectxConfig::fallback_with_overrides(lookup);
        assert_eq!(config.results_file, PathBuf::from("/tmp/detectx/results.json"));
        assert_eq!(config.log_level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_fallback_without_usable_overrides() {
        let config = DetectxConfig::fallback_with_overrides(|key| {
            (key == "DETECTX_SCAN_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config, DetectxConfig::default());
    }

    #[test]
    fn test_error_codes() {
        let dir = tempfile::tempdir().unwrap();
        let err = DetectxConfig::load_file(&dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.code(), codes::config::CONFIG_UNREADABLE);

        let err = ConfigError::Invalid {
            field: "log_level",
            reason: "unknown level 'loud'".to_string(),
        };
        assert_eq!(err.code(), codes::config::CONFIG_INVALID);
    }

    #[test]
    fn test_override_bad_timeout() {
        let result = DetectxConfig::default().with_overrides(|key| {
            (key == "DETECTX_SCAN_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_matches!(
            result,
            Err(ConfigError::Invalid {
                field: "scan_timeout_secs",
                ..
            })
        );
    }

    #[test]
    fn test_validation_failures() {
        let config = DetectxConfig {
            results_file: PathBuf::from("results.json"),
            ..DetectxConfig::default()
        };
        assert_matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "results_file",
                ..
            })
        );

        let config = DetectxConfig {
            minimum_version: "".to_string(),
            ..DetectxConfig::default()
        };
        assert_matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "minimum_version",
                ..
            })
        );

        let config = DetectxConfig {
            policy_trigger: "  ".to_string(),
            ..DetectxConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectxConfig {
            scan_timeout_secs: Some(0),
            ..DetectxConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectxConfig {
            log_level: "chatty".to_string(),
            ..DetectxConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
