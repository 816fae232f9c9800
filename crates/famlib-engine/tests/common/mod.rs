use std::io::{Cursor, Write};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use famlib_core::blob::MemoryBlobStore;
use famlib_core::clock::FixedClock;
use famlib_core::config::LibraryConfig;
use famlib_core::model::{Parameter, Snapshot};
use famlib_core::repo::MemoryRepository;
use famlib_engine::{Library, PublishRequest};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Library plus direct handles on its in-memory stores
#[allow(dead_code)]
pub struct Fixture {
    pub lib: Library,
    pub repo: Arc<MemoryRepository>,
    pub blobs: Arc<MemoryBlobStore>,
}

#[allow(dead_code)]
pub fn fixture() -> Fixture {
    fixture_with(LibraryConfig::default())
}

#[allow(dead_code)]
pub fn fixture_with(config: LibraryConfig) -> Fixture {
    let repo = Arc::new(MemoryRepository::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let lib = Library::new(repo.clone(), blobs.clone(), config)
        .unwrap()
        .with_clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )));
    Fixture { lib, repo, blobs }
}

/// Build an in-memory ZIP archive
#[allow(dead_code)]
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Artifact whose canonical hash depends only on `title`
#[allow(dead_code)]
pub fn family_artifact(title: &str, saved_at: &str, build_number: u32) -> Vec<u8> {
    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" updated="{saved_at}">
  <title>{title}</title>
  <build number="{build_number}" at="{saved_at}"/>
</entry>
"#
    );
    build_archive(&[
        ("PartAtom.xml", doc.as_bytes()),
        ("payload/geometry.bin", b"\x00\x01\x02\x03"),
    ])
}

#[allow(dead_code)]
pub fn door_snapshot(width: &str) -> Snapshot {
    Snapshot::new("Door-A")
        .with_category("Doors")
        .with_type("900x2100")
        .with_parameter(Parameter::new("Width", width))
        .with_parameter(Parameter::new("Height", "2100"))
}

/// Request publishing revision `n` of a family, distinct in content per `n`
#[allow(dead_code)]
pub fn revision(family_id: &str, n: u32) -> PublishRequest {
    PublishRequest::new(
        family_id,
        family_artifact(&format!("Door revision {}", n), "2024-01-01T00:00:00Z", n),
        door_snapshot(&(900 + n).to_string()),
    )
    .with_commit_message(format!("revision {}", n))
    .with_publisher("alice")
}
