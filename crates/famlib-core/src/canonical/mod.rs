//! Artifact canonicalization
//!
//! Artifacts are ZIP containers. Their identity must not change when the
//! authoring tool rewrites build metadata (save timestamps, build numbers),
//! so the hash is taken over a canonical byte form rather than the raw
//! archive:
//!
//! - **Document mode**: the descriptive XML document (`PartAtom.xml` by
//!   default) with build elements and timestamp attributes stripped, prolog
//!   and comments dropped, attributes sorted and text trimmed.
//! - **Manifest mode**: when no such document exists, one `path:size` line per
//!   file entry, sorted by path. Coarser: edits that keep every size intact go
//!   unnoticed.
//!
//! The two modes carry distinct prefixes so their outputs never collide.

#![allow(clippy::result_large_err)]

pub mod archive;
pub mod document;

use crate::config::CanonicalConfig;
use crate::digest::digest;
use crate::errors::ExError;
use serde::{Deserialize, Serialize};

const DOCUMENT_TAG: &[u8] = b"doc\n";
const MANIFEST_TAG: &[u8] = b"manifest\n";

/// Which canonicalization path produced the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalMode {
    Document,
    Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalArtifact {
    pub mode: CanonicalMode,
    /// Tagged canonical bytes; the input to the content hash
    pub bytes: Vec<u8>,
}

impl CanonicalArtifact {
    pub fn digest(&self) -> String {
        digest(&self.bytes)
    }
}

/// Canonicalize an artifact archive, reporting which mode was used
///
/// # Errors
///
/// `MalformedArtifact` when the archive cannot be opened or read, or when
/// the descriptive document is present but not well-formed XML.
pub fn canonicalize_artifact(
    artifact: &[u8],
    config: &CanonicalConfig,
) -> Result<CanonicalArtifact, ExError> {
    let mut zip = archive::open(artifact)?;

    match archive::read_document(&mut zip, &config.document_entry)? {
        Some(document) => {
            let body = document::canonicalize_document(&document, config)?;
            let mut bytes = Vec::with_capacity(DOCUMENT_TAG.len() + body.len());
            bytes.extend_from_slice(DOCUMENT_TAG);
            bytes.extend_from_slice(&body);
            Ok(CanonicalArtifact {
                mode: CanonicalMode::Document,
                bytes,
            })
        }
        None => {
            let listing = archive::manifest_listing(&mut zip)?;
            let mut bytes = Vec::with_capacity(MANIFEST_TAG.len() + listing.len());
            bytes.extend_from_slice(MANIFEST_TAG);
            bytes.extend_from_slice(listing.as_bytes());
            Ok(CanonicalArtifact {
                mode: CanonicalMode::Manifest,
                bytes,
            })
        }
    }
}

/// Canonical bytes of an artifact archive
///
/// # Errors
///
/// See [`canonicalize_artifact`].
pub fn canonicalize(artifact: &[u8], config: &CanonicalConfig) -> Result<Vec<u8>, ExError> {
    canonicalize_artifact(artifact, config).map(|c| c.bytes)
}

/// Content hash of an artifact: `digest(canonicalize(artifact))`
///
/// # Errors
///
/// See [`canonicalize_artifact`].
pub fn hash_artifact(artifact: &[u8], config: &CanonicalConfig) -> Result<String, ExError> {
    canonicalize_artifact(artifact, config).map(|c| c.digest())
}
