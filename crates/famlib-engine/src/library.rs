//! Library facade
//!
//! Wires a repository, a blob store and a clock together with configuration
//! and exposes every library operation as a method taking plain data.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use famlib_core::blob::{BlobStore, MemoryBlobStore};
use famlib_core::canonical::hash_artifact;
use famlib_core::chain::IntegrityViolation;
use famlib_core::clock::{Clock, SystemClock};
use famlib_core::config::LibraryConfig;
use famlib_core::diff::ChangeSet;
use famlib_core::errors::{ExError, ExErrorKind};
use famlib_core::model::{Family, FamilyVersion, Snapshot};
use famlib_core::reconcile::{LegacyNamePolicy, ReconcileItem, ReconciliationResult};
use famlib_core::repo::{FamilyRepository, MemoryRepository};
use famlib_core_types::RequestContext;
use famlib_store::{FsBlobStore, SqliteRepository};
use tokio_util::sync::CancellationToken;

use crate::commands;
use crate::commands::publish::{PublishOutcome, PublishRequest};

/// Database file name inside a library home directory
pub const DATABASE_FILE: &str = "library.db";

/// Blob directory name inside a library home directory
pub const BLOB_DIR: &str = "blobs";

/// Shared handle to one family library
#[derive(Clone)]
pub struct Library {
    pub(crate) repo: Arc<dyn FamilyRepository>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: LibraryConfig,
    pub(crate) legacy: LegacyNamePolicy,
}

impl Library {
    /// # Errors
    ///
    /// `Configuration` when `config` fails validation.
    pub fn new(
        repo: Arc<dyn FamilyRepository>,
        blobs: Arc<dyn BlobStore>,
        config: LibraryConfig,
    ) -> Result<Self, ExError> {
        config.validate()?;
        let legacy = LegacyNamePolicy::new(&config.reconcile.legacy_name_patterns)?;
        Ok(Self {
            repo,
            blobs,
            clock: Arc::new(SystemClock),
            config,
            legacy,
        })
    }

    /// Library backed entirely by memory
    ///
    /// # Errors
    ///
    /// `Configuration` when `config` fails validation.
    pub fn in_memory(config: LibraryConfig) -> Result<Self, ExError> {
        Self::new(
            Arc::new(MemoryRepository::new()),
            Arc::new(MemoryBlobStore::new()),
            config,
        )
    }

    /// Library persisted under `home`: SQLite records plus filesystem blobs
    ///
    /// # Errors
    ///
    /// `Io` if the directory cannot be created, `Persistence` or
    /// `IntegrityViolation` from opening the database, `Configuration` for
    /// an invalid `config`.
    pub fn open(home: &Path, config: LibraryConfig) -> Result<Self, ExError> {
        fs::create_dir_all(home).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("open_library")
                .with_message(format!("cannot create {}: {}", home.display(), e))
        })?;
        let repo = SqliteRepository::open(home.join(DATABASE_FILE))?;
        let blobs = FsBlobStore::new(home.join(BLOB_DIR));
        Self::new(Arc::new(repo), Arc::new(blobs), config)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn repository(&self) -> &dyn FamilyRepository {
        self.repo.as_ref()
    }

    pub fn blob_store(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    /// # Errors
    ///
    /// `InvalidInput` for a blank name or role, `AlreadyExists` for a taken name.
    pub fn create_family(&self, name: &str, role: &str) -> Result<Family, ExError> {
        commands::family::create_family(self, &RequestContext::new(), name, role)
    }

    /// # Errors
    ///
    /// Storage failures only.
    pub fn list_families(&self) -> Result<Vec<Family>, ExError> {
        commands::family::list_families(self, &RequestContext::new())
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown family.
    pub fn find_family(&self, name: &str) -> Result<Family, ExError> {
        commands::family::find_family(self, &RequestContext::new(), name)
    }

    /// Publish a new version of a family
    ///
    /// # Errors
    ///
    /// See [`commands::publish::publish`].
    pub fn publish(
        &self,
        request: &PublishRequest,
        cancel: &CancellationToken,
    ) -> Result<PublishOutcome, ExError> {
        commands::publish::publish(self, &RequestContext::new(), request, cancel)
    }

    /// Check a family's chain without repairing it
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown family, `Cancelled` if `cancel` fires.
    pub fn verify_chain(
        &self,
        family_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<IntegrityViolation>, ExError> {
        commands::verify::verify_chain(self, &RequestContext::new(), family_id, cancel)
    }

    /// Classify client-held copies; results keep input order
    ///
    /// # Errors
    ///
    /// `Cancelled` only; individual items never fail the batch.
    pub fn reconcile(
        &self,
        items: &[ReconcileItem],
        cancel: &CancellationToken,
    ) -> Result<Vec<ReconciliationResult>, ExError> {
        commands::reconcile::reconcile(self, &RequestContext::new(), items, cancel)
    }

    /// Diff two caller-held snapshots
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` for an invalid snapshot, `Cancelled` if `cancel`
    /// fires first.
    pub fn diff(
        &self,
        previous: Option<&Snapshot>,
        current: &Snapshot,
        cancel: &CancellationToken,
    ) -> Result<ChangeSet, ExError> {
        commands::diff::diff(&RequestContext::new(), previous, current, cancel)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown family or version, `Cancelled` if `cancel`
    /// fires first.
    pub fn diff_versions(
        &self,
        family_id: &str,
        from: Option<u32>,
        to: u32,
        cancel: &CancellationToken,
    ) -> Result<ChangeSet, ExError> {
        commands::diff::diff_versions(self, &RequestContext::new(), family_id, from, to, cancel)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown family.
    pub fn history(&self, family_id: &str) -> Result<Vec<FamilyVersion>, ExError> {
        commands::family::history(self, &RequestContext::new(), family_id)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown version or missing blob,
    /// `IntegrityViolation` when the stored bytes no longer hash to the
    /// recorded value.
    pub fn fetch_artifact(&self, family_id: &str, version: u32) -> Result<Vec<u8>, ExError> {
        commands::artifact::fetch_artifact(self, &RequestContext::new(), family_id, version)
    }

    /// Canonical content hash of an artifact under this library's settings
    ///
    /// # Errors
    ///
    /// `MalformedArtifact` when the archive cannot be read.
    pub fn hash(&self, artifact: &[u8]) -> Result<String, ExError> {
        hash_artifact(artifact, &self.config.canonical)
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
