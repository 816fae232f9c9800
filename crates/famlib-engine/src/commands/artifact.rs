//! Artifact retrieval with content re-verification

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::canonical::canonicalize_artifact;
use famlib_core::errors::{ExError, ExErrorKind};
use famlib_core::log_op_start;
use famlib_core_types::RequestContext;

use super::diff::require_version;
use super::finish;
use crate::Library;

/// Raw artifact bytes of one version, checked against the recorded hash
///
/// # Errors
///
/// - `NotFound`: unknown version, or the blob is gone
/// - `IntegrityViolation`: stored bytes no longer hash to the recorded value
pub fn fetch_artifact(
    lib: &Library,
    ctx: &RequestContext,
    family_id: &str,
    version: u32,
) -> Result<Vec<u8>, ExError> {
    let start = Instant::now();
    log_op_start!(
        "fetch_artifact",
        request_id = ctx.request_id.as_str(),
        family_id = family_id,
        version = version
    );

    let result = load_verified(lib, family_id, version);
    finish("fetch_artifact", ctx, start, result)
}

fn load_verified(lib: &Library, family_id: &str, version: u32) -> Result<Vec<u8>, ExError> {
    let record = require_version(lib, family_id, version)?;
    let bytes = lib.blobs.get(&record.artifact_locator)?;
    let actual = canonicalize_artifact(&bytes, &lib.config.canonical)?.digest();
    if actual != record.hash {
        return Err(ExError::new(ExErrorKind::IntegrityViolation)
            .with_entity_id(family_id)
            .with_version(version)
            .with_message(format!(
                "stored artifact hashes to {} but version records {}",
                actual, record.hash
            )));
    }
    Ok(bytes)
}
