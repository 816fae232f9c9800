use std::io::{Cursor, Write};

use chrono::{TimeZone, Utc};
use famlib_core::diff::ChangeSet;
use famlib_core::model::{Family, FamilyVersion, Snapshot};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

type EntryTime = (u16, u8, u8, u8, u8, u8);

/// Build an in-memory ZIP archive; names ending in `/` become directories
#[allow(dead_code)]
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_archive_at(entries, (2024, 1, 1, 10, 0, 0))
}

/// Same as [`build_archive`] with an explicit entry modification time
#[allow(dead_code)]
pub fn build_archive_at(entries: &[(&str, &[u8])], mtime: EntryTime) -> Vec<u8> {
    let (year, month, day, hour, minute, second) = mtime;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(
            DateTime::from_date_and_time(year, month, day, hour, minute, second).unwrap(),
        );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Descriptive document with build metadata that changes on every save
#[allow(dead_code)]
pub fn part_atom(title: &str, saved_at: &str, build_number: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" updated="{saved_at}">
  <title>{title}</title>
  <category term="Doors"/>
  <build number="{build_number}" at="{saved_at}"/>
</entry>
"#
    )
}

/// Artifact with a descriptive document plus an opaque payload
#[allow(dead_code)]
pub fn family_artifact(title: &str, saved_at: &str, build_number: u32) -> Vec<u8> {
    let doc = part_atom(title, saved_at, build_number);
    build_archive(&[
        ("PartAtom.xml", doc.as_bytes()),
        ("payload/geometry.bin", b"\x00\x01\x02\x03"),
    ])
}

#[allow(dead_code)]
pub fn hash_of(label: &str) -> String {
    famlib_core::digest::digest(label.as_bytes())
}

/// Well-formed chain of `count` versions for `family`, pointer included
#[allow(dead_code)]
pub fn linked_chain(family: &mut Family, count: u32) -> Vec<FamilyVersion> {
    let mut chain: Vec<FamilyVersion> = Vec::new();
    for n in 1..=count {
        let previous_hash = chain.last().map(|v| v.hash.clone());
        chain.push(FamilyVersion {
            family_id: family.id.clone(),
            version: n,
            hash: hash_of(&format!("{}-{}", family.name, n)),
            previous_hash,
            artifact_locator: hash_of(&format!("blob-{}-{}", family.name, n)),
            type_catalog_locator: None,
            commit_message: format!("v{}", n),
            published_at: Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap(),
            publisher: "tester".to_string(),
            snapshot: Snapshot::new(family.name.clone()),
            changes: ChangeSet::new(),
        });
    }
    family.current_version = count;
    chain
}
