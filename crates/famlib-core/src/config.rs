//! Library configuration
//!
//! Loaded from TOML; every field has a default so an empty document (or no
//! file at all) yields a working configuration.
//!
//! ```toml
//! [canonical]
//! document_entry = "PartAtom.xml"
//!
//! [reconcile]
//! parallelism = 8
//! legacy_name_patterns = ["^LEGACY_"]
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::{ExError, FamlibError};
use crate::logging_facility::Profile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default attributes carrying build metadata that must not affect identity
pub const DEFAULT_STRIPPED_ATTRIBUTES: &[&str] = &[
    "timestamp",
    "created",
    "updated",
    "modified",
    "buildDate",
    "buildTime",
    "savedAt",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    pub canonical: CanonicalConfig,
    pub publish: PublishConfig,
    pub reconcile: ReconcileConfig,
    pub logging: LoggingConfig,
}

/// Canonicalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonicalConfig {
    /// File name of the descriptive document inside the archive (case-insensitive)
    pub document_entry: String,
    /// Element local names removed together with their subtree
    pub stripped_elements: Vec<String>,
    /// Attribute local names removed wherever they appear
    pub stripped_attributes: Vec<String>,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            document_entry: "PartAtom.xml".to_string(),
            stripped_elements: vec!["build".to_string()],
            stripped_attributes: DEFAULT_STRIPPED_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Total attempts when a publish loses the pointer race (first try included)
    pub max_attempts: u32,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Worker threads used to classify a batch
    pub parallelism: usize,
    /// Regular expressions recognizing prior, unstamped identifiers
    pub legacy_name_patterns: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            legacy_name_patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

impl LibraryConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `Configuration` when the document does not parse or a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        let config: LibraryConfig = toml::from_str(text).map_err(|e| {
            ExError::from(FamlibError::Configuration {
                reason: e.to_string(),
            })
            .with_op("load_config")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `Configuration` otherwise.
    pub fn from_path(path: &Path) -> Result<Self, ExError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(crate::errors::ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// `Configuration` naming the first offending value.
    pub fn validate(&self) -> Result<(), ExError> {
        let invalid = |reason: String| -> ExError {
            ExError::from(FamlibError::Configuration { reason }).with_op("validate_config")
        };

        if self.canonical.document_entry.trim().is_empty() {
            return Err(invalid("canonical.document_entry must not be empty".into()));
        }
        if self.publish.max_attempts == 0 {
            return Err(invalid("publish.max_attempts must be at least 1".into()));
        }
        if self.reconcile.parallelism == 0 {
            return Err(invalid("reconcile.parallelism must be at least 1".into()));
        }
        for pattern in &self.reconcile.legacy_name_patterns {
            Regex::new(pattern).map_err(|e| {
                invalid(format!("legacy name pattern '{}' is invalid: {}", pattern, e))
            })?;
        }
        Ok(())
    }
}
