//! Chain verification

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::chain::{verify_versions, IntegrityViolation};
use famlib_core::errors::ExError;
use famlib_core::log_op_start;
use famlib_core_types::RequestContext;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::family::require_family;
use super::finish;
use crate::Library;

/// Walk a family's chain and report every violation found, repairing nothing
///
/// # Errors
///
/// `NotFound` for an unknown family, `Cancelled` if `cancel` fires.
pub fn verify_chain(
    lib: &Library,
    ctx: &RequestContext,
    family_id: &str,
    cancel: &CancellationToken,
) -> Result<Vec<IntegrityViolation>, ExError> {
    let start = Instant::now();
    log_op_start!(
        "verify_chain",
        request_id = ctx.request_id.as_str(),
        family_id = family_id
    );

    let result = (|| -> Result<Vec<IntegrityViolation>, ExError> {
        let family = require_family(lib, family_id)?;
        let versions = lib.repo.list_versions(&family.id)?;
        let violations = verify_versions(&family, &versions, lib.blobs.as_ref(), cancel)?;
        for violation in &violations {
            warn!(family_id = family.id.as_str(), %violation, "chain integrity violation");
        }
        Ok(violations)
    })();

    finish("verify_chain", ctx, start, result)
}
