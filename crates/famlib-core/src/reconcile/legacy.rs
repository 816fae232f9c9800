#![allow(clippy::result_large_err)]

use regex::RegexSet;

use crate::errors::{ExError, FamlibError};

/// Recognizes identifiers that follow a prior, unstamped naming convention
#[derive(Debug, Clone)]
pub struct LegacyNamePolicy {
    patterns: RegexSet,
}

impl LegacyNamePolicy {
    /// # Errors
    ///
    /// `Configuration` if any pattern fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, ExError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = RegexSet::new(patterns).map_err(|e| {
            ExError::from(FamlibError::Configuration {
                reason: format!("invalid legacy name pattern: {}", e),
            })
        })?;
        Ok(Self { patterns })
    }

    /// Policy that recognizes nothing
    pub fn none() -> Self {
        Self {
            patterns: RegexSet::empty(),
        }
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.patterns.is_match(identifier)
    }
}

impl Default for LegacyNamePolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_pattern_matches() {
        let policy = LegacyNamePolicy::new(["^LEGACY_", r"_v\d+$"]).unwrap();
        assert!(policy.matches("LEGACY_Door"));
        assert!(policy.matches("Window_v2"));
        assert!(!policy.matches("Door-A"));
    }

    #[test]
    fn test_empty_policy_matches_nothing() {
        assert!(!LegacyNamePolicy::none().matches("anything"));
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = LegacyNamePolicy::new(["("]).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::Configuration);
    }
}
