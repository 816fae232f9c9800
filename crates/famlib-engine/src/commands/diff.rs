//! Snapshot diffs: ad hoc between caller-held snapshots, or between two
//! stored versions

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::diff::{compute_diff, compute_version_changes, ChangeSet};
use famlib_core::errors::{cancelled, ExError, FamlibError};
use famlib_core::log_op_start;
use famlib_core::model::{FamilyVersion, Snapshot};
use famlib_core_types::RequestContext;
use tokio_util::sync::CancellationToken;

use super::family::require_family;
use super::finish;
use crate::Library;

pub(crate) fn require_version(
    lib: &Library,
    family_id: &str,
    version: u32,
) -> Result<FamilyVersion, ExError> {
    lib.repo.get_version(family_id, version)?.ok_or_else(|| {
        ExError::from(FamlibError::VersionNotFound {
            family_id: family_id.to_string(),
            version,
        })
    })
}

/// Changes from `previous` (or from nothing) to `current`
///
/// # Errors
///
/// `InvalidSnapshot` when either snapshot is invalid, `Cancelled` if
/// `cancel` fired before the diff ran.
pub fn diff(
    ctx: &RequestContext,
    previous: Option<&Snapshot>,
    current: &Snapshot,
    cancel: &CancellationToken,
) -> Result<ChangeSet, ExError> {
    let start = Instant::now();
    log_op_start!(
        "diff",
        request_id = ctx.request_id.as_str(),
        name = current.name.as_str(),
        initial = previous.is_none()
    );

    let result = if cancel.is_cancelled() {
        Err(cancelled("diff"))
    } else {
        compute_diff(previous, current)
    };
    finish("diff", ctx, start, result)
}

/// Changes from version `from` (or from nothing) to version `to`
///
/// # Errors
///
/// `NotFound` for an unknown family or version, `Cancelled` if `cancel`
/// fired before the diff ran.
pub fn diff_versions(
    lib: &Library,
    ctx: &RequestContext,
    family_id: &str,
    from: Option<u32>,
    to: u32,
    cancel: &CancellationToken,
) -> Result<ChangeSet, ExError> {
    let start = Instant::now();
    log_op_start!(
        "diff_versions",
        request_id = ctx.request_id.as_str(),
        family_id = family_id,
        from = ?from,
        to = to
    );

    let result = diff_stored(lib, family_id, from, to, cancel);
    finish("diff_versions", ctx, start, result)
}

fn diff_stored(
    lib: &Library,
    family_id: &str,
    from: Option<u32>,
    to: u32,
    cancel: &CancellationToken,
) -> Result<ChangeSet, ExError> {
    require_family(lib, family_id)?;
    let current = require_version(lib, family_id, to)?;
    let previous = from
        .map(|n| require_version(lib, family_id, n))
        .transpose()?;

    if cancel.is_cancelled() {
        return Err(cancelled("diff_versions").with_entity_id(family_id));
    }

    // Distinct versions compare the way publish recorded them
    let previous = previous.as_ref().map(|v| &v.snapshot);
    if from == Some(to) {
        compute_diff(previous, &current.snapshot)
    } else {
        compute_version_changes(previous, &current.snapshot)
    }
}
