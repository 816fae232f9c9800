use tracing::{debug, warn};

use super::{LegacyNamePolicy, ReconcileItem, ReconcileStatus, ReconciliationResult};
use crate::digest::{is_hex, normalize_digest};
use crate::repo::FamilyRepository;

/// Classify one item against library state
///
/// One current-head lookup by name; the family-wide hash lookup runs only
/// when the head does not match. Lookup failures are logged and yield
/// `Unmatched`.
pub fn classify_item(
    item: &ReconcileItem,
    repo: &dyn FamilyRepository,
    legacy: &LegacyNamePolicy,
) -> ReconciliationResult {
    let identifier = item.identifier.trim();
    if identifier.is_empty() || !is_hex(item.local_hash.trim()) {
        warn!(
            identifier = %item.identifier,
            local_hash = %item.local_hash,
            "malformed reconcile item"
        );
        return ReconciliationResult::unmatched(item);
    }
    let local_hash = normalize_digest(&item.local_hash);

    let entry = match repo.lookup_current(identifier) {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            debug!(identifier, "no family with this name");
            return ReconciliationResult::unmatched(item);
        }
        Err(err) => {
            warn!(identifier, err.code = err.code(), error = %err, "current lookup failed");
            return ReconciliationResult::unmatched(item);
        }
    };

    let family = &entry.family;
    let mut result = ReconciliationResult {
        identifier: item.identifier.clone(),
        local_hash: item.local_hash.clone(),
        status: ReconcileStatus::Unmatched,
        library_version: Some(family.current_version),
        library_hash: entry.head.as_ref().map(|h| h.hash.clone()),
        matched_version: None,
    };

    if let Some(head) = &entry.head {
        if head.hash == local_hash {
            result.status = ReconcileStatus::UpToDate;
            result.matched_version = Some(head.version);
            return result;
        }
    }

    match repo.find_family_version_by_hash(&family.id, &local_hash) {
        Ok(Some(matched)) => {
            let ahead = item
                .local_version
                .is_some_and(|local| local > family.current_version);
            result.status = if ahead {
                ReconcileStatus::LocalModified
            } else {
                ReconcileStatus::UpdateAvailable
            };
            result.matched_version = Some(matched.version);
        }
        Ok(None) => {
            result.status = if legacy.matches(identifier) {
                ReconcileStatus::LegacyMatch
            } else {
                ReconcileStatus::Unmatched
            };
        }
        Err(err) => {
            warn!(identifier, err.code = err.code(), error = %err, "hash lookup failed");
            return ReconciliationResult::unmatched(item);
        }
    }

    result
}
