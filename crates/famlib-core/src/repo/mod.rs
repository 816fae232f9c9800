//! Record store seam
//!
//! Repositories return fully materialized value objects; callers navigate by
//! explicit ids. The only write that touches existing state is
//! [`FamilyRepository::append_version`], which inserts a version and advances
//! the family pointer as one atomic unit.

#![allow(clippy::result_large_err)]

pub mod memory;

use crate::errors::ExError;
use crate::model::{Family, FamilyVersion};
use tokio_util::sync::CancellationToken;

pub use memory::MemoryRepository;

/// A family together with its current head version
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentEntry {
    pub family: Family,
    /// `None` until the first publish
    pub head: Option<FamilyVersion>,
}

pub trait FamilyRepository: Send + Sync {
    /// Register a new family
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the id or name is taken.
    fn create_family(&self, family: &Family) -> Result<(), ExError>;

    /// # Errors
    ///
    /// Storage failures only.
    fn get_family(&self, family_id: &str) -> Result<Option<Family>, ExError>;

    /// # Errors
    ///
    /// Storage failures only.
    fn find_family_by_name(&self, name: &str) -> Result<Option<Family>, ExError>;

    /// All families ordered by name
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn list_families(&self) -> Result<Vec<Family>, ExError>;

    /// Version with the highest number, regardless of the family pointer
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn head_version(&self, family_id: &str) -> Result<Option<FamilyVersion>, ExError>;

    /// # Errors
    ///
    /// Storage failures only.
    fn get_version(&self, family_id: &str, version: u32)
        -> Result<Option<FamilyVersion>, ExError>;

    /// All versions of a family in ascending order
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn list_versions(&self, family_id: &str) -> Result<Vec<FamilyVersion>, ExError>;

    /// Version with this hash in any family
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn find_version_by_hash(&self, hash: &str) -> Result<Option<FamilyVersion>, ExError>;

    /// # Errors
    ///
    /// Storage failures only.
    fn find_family_version_by_hash(
        &self,
        family_id: &str,
        hash: &str,
    ) -> Result<Option<FamilyVersion>, ExError>;

    /// Family and head for a reconciliation identifier, in one lookup
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn lookup_current(&self, name: &str) -> Result<Option<CurrentEntry>, ExError>;

    /// Append `version` and move the family pointer to it, atomically
    ///
    /// Succeeds only if the family's pointer still equals `expected_current`
    /// and `version.version == expected_current + 1`. Nothing is written when
    /// any check fails or `cancel` has fired.
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown family
    /// - `ConcurrencyConflict`: pointer moved since it was read
    /// - `DuplicateContent`: hash already stored (carries owner and version)
    /// - `Cancelled`: token observed before commit
    fn append_version(
        &self,
        version: &FamilyVersion,
        expected_current: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ExError>;
}
