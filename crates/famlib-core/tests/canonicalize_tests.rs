#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{build_archive, build_archive_at, family_artifact, part_atom};
use famlib_core::canonical::{canonicalize, canonicalize_artifact, hash_artifact, CanonicalMode};
use famlib_core::config::CanonicalConfig;
use famlib_core::errors::ExErrorKind;

fn config() -> CanonicalConfig {
    CanonicalConfig::default()
}

#[test]
fn test_hash_ignores_build_metadata() {
    // Given two saves of the same family differing only in build metadata
    let first = family_artifact("Door-A", "2024-01-01T10:00:00Z", 17);
    let second = family_artifact("Door-A", "2024-06-30T23:59:59Z", 4711);
    assert_ne!(first, second);

    // When hashed / Then identity is unchanged
    assert_eq!(
        hash_artifact(&first, &config()).unwrap(),
        hash_artifact(&second, &config()).unwrap()
    );
}

#[test]
fn test_hash_ignores_zip_entry_times() {
    let doc = part_atom("Door-A", "2024-01-01T10:00:00Z", 1);
    let a = build_archive_at(&[("PartAtom.xml", doc.as_bytes())], (2024, 1, 1, 0, 0, 0));
    let b = build_archive_at(&[("PartAtom.xml", doc.as_bytes())], (2025, 5, 5, 5, 5, 4));
    assert_ne!(a, b);
    assert_eq!(
        hash_artifact(&a, &config()).unwrap(),
        hash_artifact(&b, &config()).unwrap()
    );
}

#[test]
fn test_hash_detects_content_change() {
    let a = family_artifact("Door-A", "2024-01-01T10:00:00Z", 1);
    let b = family_artifact("Door-B", "2024-01-01T10:00:00Z", 1);
    assert_ne!(
        hash_artifact(&a, &config()).unwrap(),
        hash_artifact(&b, &config()).unwrap()
    );
}

#[test]
fn test_hash_is_lowercase_hex() {
    let hash = hash_artifact(&family_artifact("Door-A", "t", 1), &config()).unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn test_document_entry_matched_case_insensitively_in_subdirectory() {
    let archive = build_archive(&[("meta/", b""), ("meta/partatom.XML", b"<entry id=\"x\"/>")]);

    let canonical = canonicalize_artifact(&archive, &config()).unwrap();

    assert_eq!(canonical.mode, CanonicalMode::Document);
    assert_eq!(canonical.bytes, b"doc\n<entry id=\"x\"/>".to_vec());
}

#[test]
fn test_fallback_lists_files_sorted_by_path() {
    // Given an archive without a descriptive document
    let archive = build_archive(&[
        ("z.bin", b"12345"),
        ("dir/", b""),
        ("dir/a.txt", b"abc"),
        ("B.dat", b""),
    ]);

    // When canonicalized
    let canonical = canonicalize_artifact(&archive, &config()).unwrap();

    // Then each file appears as path:size, directories skipped, byte order
    assert_eq!(canonical.mode, CanonicalMode::Manifest);
    assert_eq!(
        String::from_utf8(canonical.bytes).unwrap(),
        "manifest\nB.dat:0\ndir/a.txt:3\nz.bin:5"
    );
}

#[test]
fn test_fallback_misses_same_size_edits() {
    let a = build_archive(&[("geometry.bin", b"aaaa")]);
    let b = build_archive(&[("geometry.bin", b"bbbb")]);
    assert_eq!(
        canonicalize(&a, &config()).unwrap(),
        canonicalize(&b, &config()).unwrap()
    );
}

#[test]
fn test_modes_never_collide() {
    let with_doc = build_archive(&[("PartAtom.xml", b"<a/>")]);
    let without = build_archive(&[("Other.xml", b"<a/>")]);
    assert_ne!(
        hash_artifact(&with_doc, &config()).unwrap(),
        hash_artifact(&without, &config()).unwrap()
    );
}

#[test]
fn test_non_zip_is_malformed() {
    let err = hash_artifact(b"PK\x03\x04 truncated", &config()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MalformedArtifact);
    assert_eq!(err.code(), "ERR_MALFORMED_ARTIFACT");
}

#[test]
fn test_broken_document_is_malformed() {
    let archive = build_archive(&[("PartAtom.xml", b"<entry><title>Door</entry>")]);
    let err = hash_artifact(&archive, &config()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MalformedArtifact);
}

#[test]
fn test_custom_document_entry_and_strip_rules() {
    let mut custom = config();
    custom.document_entry = "family.xml".to_string();
    custom.stripped_attributes = vec!["rev".to_string()];

    let a = build_archive(&[("family.xml", b"<f rev=\"1\" name=\"x\"/>")]);
    let b = build_archive(&[("family.xml", b"<f rev=\"2\" name=\"x\"/>")]);

    let canonical = canonicalize_artifact(&a, &custom).unwrap();
    assert_eq!(canonical.mode, CanonicalMode::Document);
    assert_eq!(canonical.bytes, b"doc\n<f name=\"x\"/>".to_vec());
    assert_eq!(
        hash_artifact(&a, &custom).unwrap(),
        hash_artifact(&b, &custom).unwrap()
    );

    // Default config looks for PartAtom.xml and falls back to the listing
    assert_eq!(
        canonicalize_artifact(&a, &config()).unwrap().mode,
        CanonicalMode::Manifest
    );
}
