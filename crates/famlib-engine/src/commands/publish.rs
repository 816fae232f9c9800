//! Publish orchestration
//!
//! ## Pipeline (in order):
//! 1. Snapshot validation (no writes)
//! 2. Canonicalize and hash the artifact (no writes)
//! 3. Load the family
//! 4. Global duplicate-hash check
//! 5. Head / pointer agreement check
//! 6. Blob writes (content-addressed, outside the record transaction)
//! 7. Change set against the head snapshot
//! 8. Atomic append + pointer compare-and-swap
//!
//! Steps 3-8 are retried with a fresh head when step 8 loses the pointer
//! race, up to `publish.max_attempts` attempts in total.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::canonical::canonicalize_artifact;
use famlib_core::diff::{compute_version_changes, ChangeSet};
use famlib_core::errors::{cancelled, ExError, ExErrorKind, FamlibError};
use famlib_core::log_op_start;
use famlib_core::model::{FamilyVersion, Snapshot};
use famlib_core_types::RequestContext;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::family::require_family;
use super::finish;
use crate::Library;

/// Everything needed to publish one version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub family_id: String,
    /// Raw artifact archive
    pub artifact: Vec<u8>,
    /// Raw type catalog, stored alongside when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_catalog: Option<Vec<u8>>,
    pub snapshot: Snapshot,
    pub commit_message: String,
    pub publisher: String,
}

impl PublishRequest {
    pub fn new(family_id: impl Into<String>, artifact: Vec<u8>, snapshot: Snapshot) -> Self {
        Self {
            family_id: family_id.into(),
            artifact,
            type_catalog: None,
            snapshot,
            commit_message: String::new(),
            publisher: String::new(),
        }
    }

    pub fn with_type_catalog(mut self, catalog: Vec<u8>) -> Self {
        self.type_catalog = Some(catalog);
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub version: FamilyVersion,
    /// Same change set as stored on `version`
    pub changes: ChangeSet,
    /// Attempts used, 1 unless a concurrent publish forced a retry
    pub attempts: u32,
}

/// Publish a new version of a family
///
/// # Errors
///
/// - `InvalidInput`: blank publisher
/// - `InvalidSnapshot` / `MalformedArtifact`: rejected before any write
/// - `NotFound`: unknown family
/// - `DuplicateContent`: canonical content already published anywhere
/// - `IntegrityViolation`: family pointer disagrees with the stored head
/// - `ConcurrencyConflict`: lost the pointer race on every attempt
/// - `Cancelled`: `cancel` fired before commit
pub fn publish(
    lib: &Library,
    ctx: &RequestContext,
    request: &PublishRequest,
    cancel: &CancellationToken,
) -> Result<PublishOutcome, ExError> {
    let start = Instant::now();
    log_op_start!(
        "publish",
        request_id = ctx.request_id.as_str(),
        family_id = request.family_id.as_str(),
        artifact_bytes = request.artifact.len()
    );

    let result = publish_with_retry(lib, request, cancel);

    finish("publish", ctx, start, result)
}

fn publish_with_retry(
    lib: &Library,
    request: &PublishRequest,
    cancel: &CancellationToken,
) -> Result<PublishOutcome, ExError> {
    if request.publisher.trim().is_empty() {
        return Err(ExError::from(FamlibError::InvalidInput {
            reason: "publisher must not be blank".to_string(),
        }));
    }

    request.snapshot.validate()?;
    let snapshot = request.snapshot.normalized();
    let canonical = canonicalize_artifact(&request.artifact, &lib.config.canonical)?;
    let hash = canonical.digest();
    debug!(hash = %hash, mode = ?canonical.mode, "artifact canonicalized");

    let max_attempts = lib.config.publish.max_attempts;
    let mut attempt = 1;
    loop {
        match publish_once(lib, request, &snapshot, &hash, cancel) {
            Ok(version) => {
                let changes = version.changes.clone();
                return Ok(PublishOutcome {
                    version,
                    changes,
                    attempts: attempt,
                });
            }
            Err(err) if err.kind() == ExErrorKind::ConcurrencyConflict && attempt < max_attempts => {
                warn!(
                    family_id = request.family_id.as_str(),
                    attempt,
                    "pointer moved during publish, retrying with fresh head"
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn publish_once(
    lib: &Library,
    request: &PublishRequest,
    snapshot: &Snapshot,
    hash: &str,
    cancel: &CancellationToken,
) -> Result<FamilyVersion, ExError> {
    let family = require_family(lib, &request.family_id)?;

    if let Some(existing) = lib.repo.find_version_by_hash(hash)? {
        debug!(
            hash,
            owner = existing.family_id.as_str(),
            version = existing.version,
            "duplicate content rejected"
        );
        return Err(ExError::from(FamlibError::DuplicateContent {
            family_id: existing.family_id,
            existing_version: existing.version,
            hash: hash.to_string(),
        }));
    }

    let head = lib.repo.head_version(&family.id)?;
    let head_number = head.as_ref().map(|h| h.version).unwrap_or(0);
    if head_number != family.current_version {
        return Err(ExError::new(ExErrorKind::IntegrityViolation)
            .with_entity_id(&family.id)
            .with_version(family.current_version)
            .with_message(format!(
                "family pointer is at {} but newest stored version is {}",
                family.current_version, head_number
            )));
    }

    if cancel.is_cancelled() {
        return Err(cancelled("publish").with_entity_id(&family.id));
    }

    let artifact_locator = lib.blobs.put(&request.artifact)?;
    let type_catalog_locator = request
        .type_catalog
        .as_deref()
        .map(|catalog| lib.blobs.put(catalog))
        .transpose()?;

    let changes = compute_version_changes(head.as_ref().map(|h| &h.snapshot), snapshot)?;

    let version = FamilyVersion {
        family_id: family.id.clone(),
        version: family.current_version + 1,
        hash: hash.to_string(),
        previous_hash: head.map(|h| h.hash),
        artifact_locator,
        type_catalog_locator,
        commit_message: request.commit_message.clone(),
        published_at: lib.clock.now(),
        publisher: request.publisher.clone(),
        snapshot: snapshot.clone(),
        changes,
    };

    lib.repo
        .append_version(&version, family.current_version, cancel)?;
    Ok(version)
}
