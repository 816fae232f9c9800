#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::Utc;
use common::{hash_of, linked_chain};
use famlib_core::blob::{BlobStore, MemoryBlobStore};
use famlib_core::chain::{verify_versions, IntegrityViolation};
use famlib_core::errors::ExErrorKind;
use famlib_core::model::{Family, FamilyVersion};
use tokio_util::sync::CancellationToken;

/// Chain of `count` versions whose artifact blobs all exist
fn stored_chain(count: u32) -> (Family, Vec<FamilyVersion>, MemoryBlobStore) {
    let mut family = Family::new("Door-A", "architecture", Utc::now());
    let mut chain = linked_chain(&mut family, count);
    let blobs = MemoryBlobStore::new();
    for version in &mut chain {
        version.artifact_locator = blobs
            .put(format!("artifact {}", version.version).as_bytes())
            .unwrap();
    }
    (family, chain, blobs)
}

#[test]
fn test_intact_chain_has_no_violations() {
    let (family, chain, blobs) = stored_chain(5);
    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn test_empty_unpublished_family_is_intact() {
    let family = Family::new("Door-A", "architecture", Utc::now());
    let violations =
        verify_versions(&family, &[], &MemoryBlobStore::new(), &CancellationToken::new())
            .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_broken_link_reported() {
    // Given version 3 pointing at the wrong predecessor
    let (family, mut chain, blobs) = stored_chain(4);
    let wrong = hash_of("tampered");
    chain[2].previous_hash = Some(wrong.clone());

    // When verified
    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();

    // Then exactly one broken link is reported
    assert_eq!(
        violations,
        vec![IntegrityViolation::BrokenLink {
            version: 3,
            expected_previous_hash: chain[1].hash.clone(),
            actual_previous_hash: Some(wrong),
        }]
    );
}

#[test]
fn test_rewritten_hash_breaks_successor_link() {
    let (family, mut chain, blobs) = stored_chain(3);
    chain[1].hash = hash_of("rewritten");
    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        violations[0],
        IntegrityViolation::BrokenLink { version: 3, .. }
    ));
}

#[test]
fn test_gap_and_pointer_mismatch_reported() {
    let (mut family, mut chain, blobs) = stored_chain(4);
    chain.remove(1);
    family.current_version = 5;

    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();

    assert_eq!(
        violations,
        vec![
            IntegrityViolation::VersionGap {
                expected: 2,
                found: 3
            },
            IntegrityViolation::PointerMismatch {
                current_version: 5,
                newest_version: 4
            },
        ]
    );
}

#[test]
fn test_genesis_with_previous_hash_reported() {
    let (family, mut chain, blobs) = stored_chain(1);
    chain[0].previous_hash = Some(hash_of("ghost"));
    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();
    assert_eq!(
        violations,
        vec![IntegrityViolation::GenesisHasPreviousHash {
            previous_hash: hash_of("ghost")
        }]
    );
}

#[test]
fn test_missing_artifact_reported() {
    let (family, chain, blobs) = stored_chain(2);
    blobs.delete(&chain[0].artifact_locator).unwrap();

    let violations =
        verify_versions(&family, &chain, &blobs, &CancellationToken::new()).unwrap();

    assert_eq!(
        violations,
        vec![IntegrityViolation::MissingArtifact {
            version: 1,
            locator: chain[0].artifact_locator.clone()
        }]
    );
}

#[test]
fn test_cancelled_walk_fails() {
    let (family, chain, blobs) = stored_chain(3);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = verify_versions(&family, &chain, &blobs, &cancel).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Cancelled);
}

#[test]
fn test_violation_display_is_readable() {
    let text = IntegrityViolation::PointerMismatch {
        current_version: 2,
        newest_version: 3,
    }
    .to_string();
    assert!(text.contains("version 2"));
    assert!(text.contains("3"));
}
