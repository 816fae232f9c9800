//! ZIP container access

#![allow(clippy::result_large_err)]

use crate::errors::{ExError, FamlibError};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub type ArtifactArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn malformed(reason: String) -> ExError {
    ExError::from(FamlibError::MalformedArtifact { reason }).with_op("canonicalize")
}

/// Open an in-memory archive
///
/// # Errors
///
/// `MalformedArtifact` if the bytes are not a readable ZIP container.
pub fn open(bytes: &[u8]) -> Result<ArtifactArchive<'_>, ExError> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| malformed(format!("cannot open artifact archive: {}", e)))
}

/// Entry path with separators normalized to `/`
fn entry_path(name: &str) -> String {
    name.replace('\\', "/")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Contents of the entry whose file name equals `entry_name` (ASCII
/// case-insensitive), in any directory
///
/// If several entries qualify, the one with the smallest path wins.
///
/// # Errors
///
/// `MalformedArtifact` if an entry header or the document itself cannot be read.
pub fn read_document(
    archive: &mut ArtifactArchive<'_>,
    entry_name: &str,
) -> Result<Option<Vec<u8>>, ExError> {
    let mut best: Option<(String, usize)> = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| malformed(format!("cannot read entry {}: {}", index, e)))?;
        if entry.is_dir() {
            continue;
        }
        let path = entry_path(entry.name());
        if !file_name(&path).eq_ignore_ascii_case(entry_name) {
            continue;
        }
        let replace = match &best {
            Some((current, _)) => path < *current,
            None => true,
        };
        if replace {
            best = Some((path, index));
        }
    }

    let Some((path, index)) = best else {
        return Ok(None);
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|e| malformed(format!("cannot read entry {}: {}", path, e)))?;
    let mut contents = Vec::new();
    entry
        .read_to_end(&mut contents)
        .map_err(|e| malformed(format!("cannot decompress {}: {}", path, e)))?;
    Ok(Some(contents))
}

/// Fallback listing: one `path:size` line per file entry, sorted by path
///
/// # Errors
///
/// `MalformedArtifact` if an entry header cannot be read.
pub fn manifest_listing(archive: &mut ArtifactArchive<'_>) -> Result<String, ExError> {
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| malformed(format!("cannot read entry {}: {}", index, e)))?;
        if entry.is_dir() {
            continue;
        }
        entries.push((entry_path(entry.name()), entry.size()));
    }
    entries.sort();

    Ok(entries
        .iter()
        .map(|(path, size)| format!("{}:{}", path, size))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(file_name("meta/PartAtom.xml"), "PartAtom.xml");
        assert_eq!(file_name("PartAtom.xml"), "PartAtom.xml");
        assert_eq!(entry_path("a\\b\\c.bin"), "a/b/c.bin");
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let err = open(b"definitely not a zip").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::MalformedArtifact);
    }
}
