//! Snapshot diff computation engine.
//!
//! The entry point is [`compute_diff`], which compares an optional previous
//! snapshot with the current one and produces a [`ChangeSet`].

#![allow(clippy::result_large_err)]

use crate::diff::model::{ChangeItem, ChangeKind, ChangeSet, ParameterChange, ScalarChange};
use crate::errors::ExError;
use crate::model::Snapshot;
use std::collections::HashMap;

/// Compute the change set between `previous` and `current`.
///
/// With no previous snapshot every non-empty field of `current` is reported
/// as added. Items are emitted in category order: Name, Category, Types,
/// Parameters, Geometry, AuxText. Identical snapshots never differ, even
/// when the geometry flag is set.
///
/// # Errors
///
/// `InvalidSnapshot` if either snapshot fails validation. No partial
/// change set is ever returned.
pub fn compute_diff(
    previous: Option<&Snapshot>,
    current: &Snapshot,
) -> Result<ChangeSet, ExError> {
    diff_snapshots(previous, current, true)
}

/// Change set recorded on a newly published version
///
/// Same as [`compute_diff`] except that an unchanged snapshot whose
/// geometry flag is set still yields a Geometry item: a re-export that only
/// touched geometry is an edit.
///
/// # Errors
///
/// `InvalidSnapshot` if either snapshot fails validation.
pub fn compute_version_changes(
    previous: Option<&Snapshot>,
    current: &Snapshot,
) -> Result<ChangeSet, ExError> {
    diff_snapshots(previous, current, false)
}

fn diff_snapshots(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    identical_is_empty: bool,
) -> Result<ChangeSet, ExError> {
    if let Some(previous) = previous {
        previous
            .validate()
            .map_err(|e| ExError::from(e).with_op("diff"))?;
    }
    current
        .validate()
        .map_err(|e| ExError::from(e).with_op("diff"))?;

    let items = match previous {
        None => initial_items(current),
        Some(previous) if identical_is_empty && previous == current => Vec::new(),
        Some(previous) => delta_items(previous, current),
    };
    Ok(ChangeSet { items })
}

/// Items for a family's first version
fn initial_items(current: &Snapshot) -> Vec<ChangeItem> {
    let mut items = Vec::new();

    if !current.name.is_empty() {
        items.push(ChangeItem::Name(ScalarChange::added(&current.name)));
    }
    if !current.category.is_empty() {
        items.push(ChangeItem::Category(ScalarChange::added(&current.category)));
    }
    if !current.types.is_empty() {
        items.push(ChangeItem::Types {
            added: current.types.iter().cloned().collect(),
            removed: Vec::new(),
        });
    }
    if !current.parameters.is_empty() {
        items.push(ChangeItem::Parameters {
            changes: current
                .parameters
                .iter()
                .map(|p| ParameterChange {
                    name: p.name.clone(),
                    kind: ChangeKind::Added,
                    previous: None,
                    current: Some(p.value.clone()),
                })
                .collect(),
        });
    }
    if current.geometry_changed {
        items.push(ChangeItem::Geometry {
            kind: ChangeKind::Added,
        });
    }
    if let Some(hash) = &current.aux_text_hash {
        items.push(ChangeItem::AuxText(ScalarChange::added(hash)));
    }

    items
}

fn delta_items(previous: &Snapshot, current: &Snapshot) -> Vec<ChangeItem> {
    let mut items = Vec::new();

    if previous.name != current.name {
        items.push(ChangeItem::Name(ScalarChange::changed(
            &previous.name,
            &current.name,
        )));
    }
    if previous.category != current.category {
        items.push(ChangeItem::Category(ScalarChange::changed(
            &previous.category,
            &current.category,
        )));
    }

    // BTreeSet difference iterates in sorted order
    let added: Vec<String> = current.types.difference(&previous.types).cloned().collect();
    let removed: Vec<String> = previous.types.difference(&current.types).cloned().collect();
    if !added.is_empty() || !removed.is_empty() {
        items.push(ChangeItem::Types { added, removed });
    }

    let changes = parameter_changes(previous, current);
    if !changes.is_empty() {
        items.push(ChangeItem::Parameters { changes });
    }

    if current.geometry_changed {
        items.push(ChangeItem::Geometry {
            kind: ChangeKind::Changed,
        });
    }

    match (&previous.aux_text_hash, &current.aux_text_hash) {
        (None, Some(hash)) => items.push(ChangeItem::AuxText(ScalarChange::added(hash))),
        (Some(hash), None) => items.push(ChangeItem::AuxText(ScalarChange::removed(hash))),
        (Some(before), Some(after)) if before != after => {
            items.push(ChangeItem::AuxText(ScalarChange::changed(before, after)))
        }
        _ => {}
    }

    items
}

/// Changed and added parameters in current order, then removed ones in
/// previous order
fn parameter_changes(previous: &Snapshot, current: &Snapshot) -> Vec<ParameterChange> {
    let before: HashMap<&str, &str> = previous
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();
    let after: HashMap<&str, &str> = current
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();

    let mut changes = Vec::new();

    for parameter in &current.parameters {
        match before.get(parameter.name.as_str()) {
            Some(old) if *old != parameter.value => changes.push(ParameterChange {
                name: parameter.name.clone(),
                kind: ChangeKind::Changed,
                previous: Some((*old).to_string()),
                current: Some(parameter.value.clone()),
            }),
            Some(_) => {}
            None => changes.push(ParameterChange {
                name: parameter.name.clone(),
                kind: ChangeKind::Added,
                previous: None,
                current: Some(parameter.value.clone()),
            }),
        }
    }

    for parameter in &previous.parameters {
        if !after.contains_key(parameter.name.as_str()) {
            changes.push(ParameterChange {
                name: parameter.name.clone(),
                kind: ChangeKind::Removed,
                previous: Some(parameter.value.clone()),
                current: None,
            });
        }
    }

    changes
}
