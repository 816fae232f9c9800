//! Supplementary operations: families, history, diffs, artifacts, verification

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{door_snapshot, family_artifact, fixture, revision};
use famlib_core::blob::BlobStore;
use famlib_core::chain::IntegrityViolation;
use famlib_core::config::LibraryConfig;
use famlib_core::diff::{render_changelog, ChangeCategory};
use famlib_core::errors::ExErrorKind;
use famlib_engine::{Library, PublishRequest};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

#[test]
fn test_create_family_trims_and_rejects_blanks() {
    let fx = fixture();
    let family = fx.lib.create_family("  Door-A ", "architecture").unwrap();
    assert_eq!(family.name, "Door-A");
    assert_eq!(family.current_version, 0);

    let err = fx.lib.create_family("   ", "architecture").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    let err = fx.lib.create_family("Window-B", "").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_duplicate_family_name() {
    let fx = fixture();
    fx.lib.create_family("Door-A", "architecture").unwrap();
    let err = fx.lib.create_family("Door-A", "interiors").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}

#[test]
fn test_find_and_list_families() {
    let fx = fixture();
    fx.lib.create_family("Window-B", "architecture").unwrap();
    let door = fx.lib.create_family("Door-A", "architecture").unwrap();

    assert_eq!(fx.lib.find_family("Door-A").unwrap().id, door.id);
    assert_eq!(
        fx.lib.find_family("Nope").unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    let names: Vec<String> = fx
        .lib
        .list_families()
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["Door-A", "Window-B"]);
}

#[test]
fn test_history_of_unknown_family() {
    let fx = fixture();
    assert_eq!(
        fx.lib.history("missing").unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

// ---------------------------------------------------------------------------
// Diffs between stored versions
// ---------------------------------------------------------------------------

#[test]
fn test_diff_versions_matches_publish_time_changes() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();
    let v2 = fx.lib.publish(&revision(&family.id, 2), &cancel).unwrap();

    let diff = fx.lib.diff_versions(&family.id, Some(1), 2, &cancel).unwrap();

    assert_eq!(diff, v2.changes);
    assert_eq!(diff.categories(), vec![ChangeCategory::Parameters]);
}

#[test]
fn test_diff_from_nothing_and_self_diff() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    let v1 = fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();

    assert_eq!(fx.lib.diff_versions(&family.id, None, 1, &cancel).unwrap(), v1.changes);
    assert!(!fx
        .lib
        .diff_versions(&family.id, Some(1), 1, &cancel)
        .unwrap()
        .has_changes());
}

#[test]
fn test_diff_unknown_version() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    fx.lib
        .publish(&revision(&family.id, 1), &CancellationToken::new())
        .unwrap();

    let err = fx
        .lib
        .diff_versions(&family.id, Some(1), 3, &CancellationToken::new())
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.version(), Some(3));
}

#[test]
fn test_cancelled_diff_versions() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();
    fx.lib.publish(&revision(&family.id, 2), &cancel).unwrap();
    cancel.cancel();

    let err = fx
        .lib
        .diff_versions(&family.id, Some(1), 2, &cancel)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Cancelled);
}

#[test]
fn test_geometry_only_reexport_records_geometry_change() {
    // Given two publishes with the same geometry-flagged snapshot
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    let snapshot = door_snapshot("900").with_geometry_changed(true);
    for n in 1..=2 {
        let request = PublishRequest::new(
            &family.id,
            family_artifact(&format!("Door geometry {}", n), "2024-01-01T00:00:00Z", n),
            snapshot.clone(),
        )
        .with_publisher("alice");
        fx.lib.publish(&request, &cancel).unwrap();
    }

    // Then v2 records the geometry edit, and diffing stored versions agrees
    let history = fx.lib.history(&family.id).unwrap();
    assert_eq!(history[1].changes.categories(), vec![ChangeCategory::Geometry]);
    assert_eq!(
        fx.lib
            .diff_versions(&family.id, Some(1), 2, &cancel)
            .unwrap(),
        history[1].changes
    );
    assert!(!fx
        .lib
        .diff_versions(&family.id, Some(2), 2, &cancel)
        .unwrap()
        .has_changes());
}

// ---------------------------------------------------------------------------
// Diffs between caller-held snapshots
// ---------------------------------------------------------------------------

#[test]
fn test_snapshot_diff_through_library() {
    let fx = fixture();
    let cancel = CancellationToken::new();
    let before = door_snapshot("900");
    let after = door_snapshot("1000");

    let changes = fx.lib.diff(Some(&before), &after, &cancel).unwrap();
    assert_eq!(changes.categories(), vec![ChangeCategory::Parameters]);

    assert!(!fx
        .lib
        .diff(Some(&after), &after, &cancel)
        .unwrap()
        .has_changes());
    assert!(fx.lib.diff(None, &after, &cancel).unwrap().has_changes());
}

#[test]
fn test_snapshot_diff_cancelled_and_invalid() {
    let fx = fixture();
    let cancel = CancellationToken::new();
    let invalid = door_snapshot("900").with_type(" ");

    let err = fx.lib.diff(None, &invalid, &cancel).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidSnapshot);
    assert!(err.request_id().is_some());

    cancel.cancel();
    let err = fx
        .lib
        .diff(None, &door_snapshot("900"), &cancel)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Cancelled);
}

#[test]
fn test_changelog_renders_stored_changes() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();
    fx.lib.publish(&revision(&family.id, 2), &cancel).unwrap();

    let history = fx.lib.history(&family.id).unwrap();
    let text = render_changelog(&history[1].changes);

    assert!(text.contains("Width"));
    assert_eq!(text, render_changelog(&history[1].changes));
}

// ---------------------------------------------------------------------------
// Artifacts and verification
// ---------------------------------------------------------------------------

#[test]
fn test_fetch_artifact_returns_published_bytes() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let request = revision(&family.id, 1);
    fx.lib.publish(&request, &CancellationToken::new()).unwrap();

    assert_eq!(fx.lib.fetch_artifact(&family.id, 1).unwrap(), request.artifact);
    assert_eq!(
        fx.lib.fetch_artifact(&family.id, 2).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_fetch_artifact_detects_hash_drift() {
    // Given a version published under the default canonical settings
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    fx.lib
        .publish(&revision(&family.id, 1), &CancellationToken::new())
        .unwrap();

    // When the same stores are read with build metadata no longer stripped
    let mut config = LibraryConfig::default();
    config.canonical.stripped_elements.clear();
    let reader = Library::new(fx.repo.clone(), fx.blobs.clone(), config).unwrap();

    // Then the recomputed hash disagrees with the record
    let err = reader.fetch_artifact(&family.id, 1).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::IntegrityViolation);
}

#[test]
fn test_verify_reports_missing_artifact() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();
    let v2 = fx.lib.publish(&revision(&family.id, 2), &cancel).unwrap();

    fx.blobs.delete(&v2.version.artifact_locator).unwrap();

    assert_eq!(
        fx.lib.verify_chain(&family.id, &cancel).unwrap(),
        vec![IntegrityViolation::MissingArtifact {
            version: 2,
            locator: v2.version.artifact_locator.clone(),
        }]
    );
}

#[test]
fn test_verify_unknown_family_and_cancellation() {
    let fx = fixture();
    let family = fx.lib.create_family("Door-A", "architecture").unwrap();
    let cancel = CancellationToken::new();
    fx.lib.publish(&revision(&family.id, 1), &cancel).unwrap();

    assert_eq!(
        fx.lib.verify_chain("missing", &cancel).unwrap_err().kind(),
        ExErrorKind::NotFound
    );

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    assert_eq!(
        fx.lib.verify_chain(&family.id, &cancelled).unwrap_err().kind(),
        ExErrorKind::Cancelled
    );
}

// ---------------------------------------------------------------------------
// Durable library
// ---------------------------------------------------------------------------

#[test]
fn test_open_library_persists_across_reopen() {
    // Given a library on disk with two versions
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let (family_id, request) = {
        let lib = Library::open(dir.path(), LibraryConfig::default()).unwrap();
        let family = lib.create_family("Door-A", "architecture").unwrap();
        lib.publish(&revision(&family.id, 1), &cancel).unwrap();
        let request = revision(&family.id, 2);
        lib.publish(&request, &cancel).unwrap();
        (family.id, request)
    };

    // When it is reopened
    let lib = Library::open(dir.path(), LibraryConfig::default()).unwrap();

    // Then chain, changes and artifacts are all intact
    let history = lib.history(&family_id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].previous_hash.as_deref(), Some(history[0].hash.as_str()));
    assert!(history[1].changes.has_changes());
    assert!(lib.verify_chain(&family_id, &cancel).unwrap().is_empty());
    assert_eq!(lib.fetch_artifact(&family_id, 2).unwrap(), request.artifact);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = LibraryConfig::default();
    config.reconcile.parallelism = 0;
    let err = Library::in_memory(config).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Configuration);

    let mut config = LibraryConfig::default();
    config.reconcile.legacy_name_patterns = vec!["(".to_string()];
    let err = Library::in_memory(config).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Configuration);
}
