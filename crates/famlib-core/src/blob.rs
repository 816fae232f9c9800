//! Blob storage seam
//!
//! Raw artifacts and type catalogs live outside the record store. Locators
//! are the SHA-256 of the raw bytes, so writes are idempotent and a blob can
//! be stored before the version record that references it commits.

#![allow(clippy::result_large_err)]

use crate::digest::digest;
use crate::errors::{ExError, ExErrorKind};
use std::collections::HashMap;
use std::sync::RwLock;

/// Content-addressed blob storage
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return their locator
    ///
    /// # Errors
    ///
    /// `Io` / `Persistence` on storage failure.
    fn put(&self, bytes: &[u8]) -> Result<String, ExError>;

    /// # Errors
    ///
    /// `NotFound` when no blob has this locator.
    fn get(&self, locator: &str) -> Result<Vec<u8>, ExError>;

    /// # Errors
    ///
    /// Storage failures only; a missing blob is `Ok(false)`.
    fn exists(&self, locator: &str) -> Result<bool, ExError>;

    /// Remove a blob; removing an absent blob succeeds
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn delete(&self, locator: &str) -> Result<(), ExError>;
}

pub(crate) fn blob_missing(locator: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("blob_get")
        .with_entity_id(locator)
        .with_message("blob not found")
}

fn poisoned() -> ExError {
    ExError::new(ExErrorKind::Internal).with_message("blob store lock poisoned")
}

/// In-memory blob store for embedded use and tests
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, bytes: &[u8]) -> Result<String, ExError> {
        let locator = digest(bytes);
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs
            .entry(locator.clone())
            .or_insert_with(|| bytes.to_vec());
        Ok(locator)
    }

    fn get(&self, locator: &str) -> Result<Vec<u8>, ExError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        blobs
            .get(locator)
            .cloned()
            .ok_or_else(|| blob_missing(locator))
    }

    fn exists(&self, locator: &str) -> Result<bool, ExError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.contains_key(locator))
    }

    fn delete(&self, locator: &str) -> Result<(), ExError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.remove(locator);
        Ok(())
    }
}
