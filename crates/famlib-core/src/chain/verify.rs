#![allow(clippy::result_large_err)]

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::blob::BlobStore;
use crate::errors::{cancelled, ExError};
use crate::model::{Family, FamilyVersion};

/// A single broken rule found in a family's persisted history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// Version numbers skip (or repeat) a value
    VersionGap { expected: u32, found: u32 },
    /// Version 1 claims a predecessor
    GenesisHasPreviousHash { previous_hash: String },
    /// `previous_hash` of `version` does not equal the hash of `version - 1`
    BrokenLink {
        version: u32,
        expected_previous_hash: String,
        actual_previous_hash: Option<String>,
    },
    /// Family pointer disagrees with the newest stored version
    PointerMismatch {
        current_version: u32,
        newest_version: u32,
    },
    /// Blob store has no blob for a referenced locator
    MissingArtifact { version: u32, locator: String },
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityViolation::VersionGap { expected, found } => {
                write!(f, "version gap: expected {}, found {}", expected, found)
            }
            IntegrityViolation::GenesisHasPreviousHash { previous_hash } => {
                write!(f, "version 1 links to previous hash {}", previous_hash)
            }
            IntegrityViolation::BrokenLink {
                version,
                expected_previous_hash,
                actual_previous_hash,
            } => write!(
                f,
                "version {} links to {} instead of {}",
                version,
                actual_previous_hash.as_deref().unwrap_or("nothing"),
                expected_previous_hash
            ),
            IntegrityViolation::PointerMismatch {
                current_version,
                newest_version,
            } => write!(
                f,
                "family points at version {} but newest stored version is {}",
                current_version, newest_version
            ),
            IntegrityViolation::MissingArtifact { version, locator } => {
                write!(f, "version {} references missing blob {}", version, locator)
            }
        }
    }
}

/// Check a family's versions against the chain rules
///
/// `versions` must be in ascending order. Violations are reported in the
/// order they are met while walking the chain; the pointer check comes last.
///
/// # Errors
///
/// `Cancelled` if `cancel` fires mid-walk; blob store failures other than
/// "missing" are propagated.
pub fn verify_versions(
    family: &Family,
    versions: &[FamilyVersion],
    blobs: &dyn BlobStore,
    cancel: &CancellationToken,
) -> Result<Vec<IntegrityViolation>, ExError> {
    let mut violations = Vec::new();
    let mut expected: u32 = 1;
    let mut prior: Option<&FamilyVersion> = None;

    for version in versions {
        if cancel.is_cancelled() {
            return Err(cancelled("verify_chain").with_entity_id(&family.id));
        }

        if version.version != expected {
            violations.push(IntegrityViolation::VersionGap {
                expected,
                found: version.version,
            });
        }
        expected = version.version.saturating_add(1);

        if version.is_genesis() {
            if let Some(previous_hash) = &version.previous_hash {
                violations.push(IntegrityViolation::GenesisHasPreviousHash {
                    previous_hash: previous_hash.clone(),
                });
            }
        }

        // Links are only checked against a direct predecessor; gaps are reported above
        if let Some(before) = prior.filter(|p| p.version + 1 == version.version) {
            if version.previous_hash.as_deref() != Some(before.hash.as_str()) {
                violations.push(IntegrityViolation::BrokenLink {
                    version: version.version,
                    expected_previous_hash: before.hash.clone(),
                    actual_previous_hash: version.previous_hash.clone(),
                });
            }
        }

        let locators = std::iter::once(&version.artifact_locator)
            .chain(version.type_catalog_locator.as_ref());
        for locator in locators {
            if !blobs.exists(locator)? {
                violations.push(IntegrityViolation::MissingArtifact {
                    version: version.version,
                    locator: locator.clone(),
                });
            }
        }

        prior = Some(version);
    }

    let newest_version = versions.last().map(|v| v.version).unwrap_or(0);
    if family.current_version != newest_version {
        violations.push(IntegrityViolation::PointerMismatch {
            current_version: family.current_version,
            newest_version,
        });
    }

    Ok(violations)
}
