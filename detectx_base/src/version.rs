//! # Bundle Version Ordering
//!
//! DetectX publishes versions such as `0.108` and `0.110`, which compare
//! wrongly as strings. Versions are split into numeric and text components
//! and ordered component by component.

use std::cmp::Ordering;
use std::fmt;

/// One component of a version string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionComponent {
    /// Run of ASCII digits; sorts before any text component
    Numeric(u64),
    /// Run of characters that are neither digits nor dots
    Text(String),
}

/// Parsed, totally ordered version
///
/// `0.110` > `0.108` > `0.9`, `1.0b3` < `1.0.1`, and a version that is a
/// strict prefix of another sorts first (`1.0` < `1.0.0`).
#[derive(Debug, Clone)]
pub struct BundleVersion {
    raw: String,
    components: Vec<VersionComponent>,
}

impl BundleVersion {
    /// Parse a version string; `None` when it holds no components
    pub fn parse(version_str: &str) -> Option<Self> {
        let raw = version_str.trim();
        let mut components = Vec::new();
        let mut chars = raw.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c == '.' {
                chars.next();
            } else if c.is_ascii_digit() {
                let mut run = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    run.push(d);
                    chars.next();
                }
                components.push(match run.parse() {
                    Ok(n) => VersionComponent::Numeric(n),
                    Err(_) => VersionComponent::Text(run),
                });
            } else {
                let mut run = String::new();
                while let Some(&t) = chars.peek() {
                    if t == '.' || t.is_ascii_digit() {
                        break;
                    }
                    run.push(t);
                    chars.next();
                }
                components.push(VersionComponent::Text(run));
            }
        }

        if components.is_empty() {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            components,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[VersionComponent] {
        &self.components
    }

    /// Check if this version satisfies a minimum requirement
    pub fn meets_minimum(&self, minimum: &BundleVersion) -> bool {
        self >= minimum
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for BundleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for BundleVersion {}

impl PartialOrd for BundleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BundleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> BundleVersion {
        BundleVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(
            v("0.110").components(),
            &[VersionComponent::Numeric(0), VersionComponent::Numeric(110)]
        );
        assert_eq!(
            v("1.0b3").components(),
            &[
                VersionComponent::Numeric(1),
                VersionComponent::Numeric(0),
                VersionComponent::Text("b".to_string()),
                VersionComponent::Numeric(3),
            ]
        );
        assert_eq!(v(" 0.108 ").as_str(), "0.108");
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        assert!(v("0.110") >= v("0.108"));
        assert!(v("0.9") < v("0.110"));
        assert!(v("0.110").meets_minimum(&v("0.110")));
        assert!(!v("0.108").meets_minimum(&v("0.110")));
        assert!(v("1.2").meets_minimum(&v("0.110")));
    }

    #[test]
    fn test_prefix_and_text_ordering() {
        assert!(v("1.0") < v("1.0.0"));
        assert!(v("1.0b3") > v("1.0.1"));
        assert!(v("1.0a") < v("1.0b"));
        assert_eq!(v("0.110"), v("0.110"));
    }

    #[test]
    fn test_invalid_version_parsing() {
        assert!(BundleVersion::parse("").is_none());
        assert!(BundleVersion::parse("...").is_none());
        assert!(BundleVersion::parse("   ").is_none());
    }
}
