//! Filesystem-backed [`BlobStore`]

#![allow(clippy::result_large_err)]

use crate::blob::atomic::atomic_write;
use crate::blob::sharding::shard_path;
use crate::errors::{blob_collision, blob_missing, io_error, Result};
use famlib_core::blob::BlobStore;
use famlib_core::digest::{digest, is_hex_digest};
use famlib_core::errors::{ExError, ExErrorKind};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Content-addressed blob store rooted at a directory
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locators are digests; anything else could escape the root
    fn path_for(&self, locator: &str) -> Result<PathBuf> {
        if !is_hex_digest(locator) {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("blob_locator")
                .with_message(format!("invalid blob locator '{}'", locator)));
        }
        Ok(shard_path(&self.root, locator))
    }
}

impl BlobStore for FsBlobStore {
    /// Idempotent: rewriting identical bytes succeeds; different bytes under
    /// an existing locator are reported as a collision
    fn put(&self, bytes: &[u8]) -> Result<String> {
        let locator = digest(bytes);
        let target_path = self.path_for(&locator)?;

        if target_path.exists() {
            let existing = fs::read(&target_path).map_err(|e| io_error("read_blob", e))?;
            if existing == bytes {
                return Ok(locator);
            }
            return Err(blob_collision(&locator));
        }

        atomic_write(&target_path, bytes)?;
        Ok(locator)
    }

    fn get(&self, locator: &str) -> Result<Vec<u8>> {
        let path = self.path_for(locator)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(blob_missing(locator)),
            Err(e) => Err(io_error("read_blob", e)),
        }
    }

    fn exists(&self, locator: &str) -> Result<bool> {
        Ok(self.path_for(locator)?.is_file())
    }

    fn delete(&self, locator: &str) -> Result<()> {
        let path = self.path_for(locator)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete_blob", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_store() -> (FsBlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (store, _dir) = setup_test_store();
        let locator = store.put(b"artifact bytes").unwrap();
        assert_eq!(store.get(&locator).unwrap(), b"artifact bytes");
        assert!(store.exists(&locator).unwrap());
    }

    #[test]
    fn test_idempotent_put() {
        let (store, _dir) = setup_test_store();
        assert_eq!(store.put(b"same").unwrap(), store.put(b"same").unwrap());
    }

    #[test]
    fn test_collision_detected() {
        let (store, dir) = setup_test_store();
        let locator = store.put(b"original").unwrap();
        fs::write(shard_path(dir.path(), &locator), b"corrupted").unwrap();

        let err = store.put(b"original").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::IntegrityViolation);
    }

    #[test]
    fn test_missing_blob() {
        let (store, _dir) = setup_test_store();
        let err = store.get(&"0".repeat(64)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert!(!store.exists(&"0".repeat(64)).unwrap());
    }

    #[test]
    fn test_delete_then_missing() {
        let (store, _dir) = setup_test_store();
        let locator = store.put(b"gone soon").unwrap();
        store.delete(&locator).unwrap();
        assert!(!store.exists(&locator).unwrap());
        store.delete(&locator).unwrap();
    }

    #[test]
    fn test_path_traversal_locator_rejected() {
        let (store, _dir) = setup_test_store();
        let err = store.get("../../etc/passwd").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}
