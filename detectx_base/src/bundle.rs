//! # Scanner Bundle
//!
//! Locates the DetectX Swift app bundle and reads its `CFBundleVersion`.

use crate::commands::CommandRunner;
use crate::config::constants;
use crate::logging::{codes, Code};
use crate::version::BundleVersion;
use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Errors reading bundle metadata
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Info.plist not found at '{}'", .path.display())]
    InfoPlistMissing { path: PathBuf },

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is a binary property list", .path.display())]
    BinaryPlist { path: PathBuf },

    #[error("'{}' could not be parsed: {reason}", .path.display())]
    InvalidPlist { path: PathBuf, reason: String },

    #[error("Key '{key}' not present in '{}'", .path.display())]
    KeyMissing { path: PathBuf, key: &'static str },

    #[error("'{value}' is not a version")]
    InvalidVersion { value: String },

    #[error("defaults could not read '{}': {reason}", .path.display())]
    DefaultsFailed { path: PathBuf, reason: String },
}

impl BundleError {
    pub fn code(&self) -> Code {
        match self {
            BundleError::InfoPlistMissing { .. } => codes::bundle::INFO_PLIST_MISSING,
            _ => codes::bundle::BUNDLE_VERSION_UNREADABLE,
        }
    }
}

/// The DetectX Swift application bundle on disk
#[derive(Debug, Clone)]
pub struct ScannerBundle {
    app_path: PathBuf,
}

impl ScannerBundle {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
        }
    }

    pub fn app_path(&self) -> &Path {
        &self.app_path
    }

    pub fn exists(&self) -> bool {
        self.app_path.exists()
    }

    pub fn executable_path(&self) -> PathBuf {
        self.app_path.join(constants::bundle::EXECUTABLE)
    }

    pub fn info_plist_path(&self) -> PathBuf {
        self.app_path.join(constants::bundle::INFO_PLIST)
    }

    /// Read the bundle version from an XML Info.plist
    pub fn read_version(&self) -> Result<BundleVersion, BundleError> {
        let path = self.info_plist_path();
        if !path.exists() {
            return Err(BundleError::InfoPlistMissing { path });
        }

        let bytes = std::fs::read(&path).map_err(|source| BundleError::Io {
            path: path.clone(),
            source,
        })?;

        if bytes.starts_with(b"bplist") {
            return Err(BundleError::BinaryPlist { path });
        }

        let contents = String::from_utf8_lossy(&bytes);
        let value = extract_string_value(&contents, constants::bundle::VERSION_KEY, &path)?;
        parse_version(&value)
    }

    /// Like `read_version`, falling back to `defaults read` for binary plists
    pub fn read_version_with(
        &self,
        runner: &dyn CommandRunner,
    ) -> Result<BundleVersion, BundleError> {
        match self.read_version() {
            Err(BundleError::BinaryPlist { path }) => read_with_defaults(runner, &path),
            other => other,
        }
    }
}

fn extract_string_value(
    contents: &str,
    key: &'static str,
    path: &Path,
) -> Result<String, BundleError> {
    let pattern = format!(
        r"<key>\s*{}\s*</key>\s*<string>\s*([^<]*?)\s*</string>",
        regex::escape(key)
    );
    let re = Regex::new(&pattern).map_err(|e| BundleError::InvalidPlist {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    re.captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BundleError::KeyMissing {
            path: path.to_path_buf(),
            key,
        })
}

fn parse_version(value: &str) -> Result<BundleVersion, BundleError> {
    BundleVersion::parse(value).ok_or_else(|| BundleError::InvalidVersion {
        value: value.to_string(),
    })
}

/// `defaults read` expects the plist path without its extension
fn read_with_defaults(
    runner: &dyn CommandRunner,
    plist_path: &Path,
) -> Result<BundleVersion, BundleError> {
    let domain = plist_path.with_extension("");
    let args = [
        OsStr::new("read"),
        domain.as_os_str(),
        OsStr::new(constants::bundle::VERSION_KEY),
    ];

    let output = runner
        .execute(Path::new(constants::paths::DEFAULTS_BINARY), &args, None)
        .map_err(|e| BundleError::DefaultsFailed {
            path: plist_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.success() {
        return Err(BundleError::DefaultsFailed {
            path: plist_path.to_path_buf(),
            reason: format!("exit status {}: {}", output.exit_code, output.stderr.trim()),
        });
    }

    parse_version(output.stdout.trim())
}
