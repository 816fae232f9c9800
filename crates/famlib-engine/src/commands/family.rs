//! Family registration and read-side queries

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::errors::{ExError, ExErrorKind, FamlibError};
use famlib_core::log_op_start;
use famlib_core::model::{Family, FamilyVersion};
use famlib_core_types::RequestContext;

use super::finish;
use crate::Library;

/// Load a family or fail with `NotFound`
pub(crate) fn require_family(lib: &Library, family_id: &str) -> Result<Family, ExError> {
    lib.repo.get_family(family_id)?.ok_or_else(|| {
        ExError::from(FamlibError::FamilyNotFound {
            family_id: family_id.to_string(),
        })
    })
}

/// Register an unpublished family under a unique name
///
/// # Errors
///
/// - `InvalidInput`: blank name or role
/// - `AlreadyExists`: the name is taken
pub fn create_family(
    lib: &Library,
    ctx: &RequestContext,
    name: &str,
    role: &str,
) -> Result<Family, ExError> {
    let start = Instant::now();
    log_op_start!("create_family", request_id = ctx.request_id.as_str(), name = name);

    let result = register(lib, name.trim(), role.trim());
    finish("create_family", ctx, start, result)
}

fn register(lib: &Library, name: &str, role: &str) -> Result<Family, ExError> {
    if name.is_empty() || role.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_message("family name and role must not be blank"));
    }
    let family = Family::new(name, role, lib.clock.now());
    lib.repo.create_family(&family)?;
    Ok(family)
}

/// # Errors
///
/// Storage failures only.
pub fn list_families(lib: &Library, ctx: &RequestContext) -> Result<Vec<Family>, ExError> {
    let start = Instant::now();
    log_op_start!("list_families", request_id = ctx.request_id.as_str());
    finish("list_families", ctx, start, lib.repo.list_families())
}

/// Look a family up by its unique name
///
/// # Errors
///
/// `NotFound` when no family has that name.
pub fn find_family(lib: &Library, ctx: &RequestContext, name: &str) -> Result<Family, ExError> {
    let start = Instant::now();
    log_op_start!("find_family", request_id = ctx.request_id.as_str(), name = name);

    let result = lib.repo.find_family_by_name(name).and_then(|found| {
        found.ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_message(format!("no family named '{}'", name))
        })
    });

    finish("find_family", ctx, start, result)
}

/// Every version of a family, oldest first
///
/// # Errors
///
/// `NotFound` for an unknown family.
pub fn history(
    lib: &Library,
    ctx: &RequestContext,
    family_id: &str,
) -> Result<Vec<FamilyVersion>, ExError> {
    let start = Instant::now();
    log_op_start!("history", request_id = ctx.request_id.as_str(), family_id = family_id);

    let result = require_family(lib, family_id).and_then(|family| lib.repo.list_versions(&family.id));

    finish("history", ctx, start, result)
}
