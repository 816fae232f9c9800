//! In-memory repository
//!
//! All state sits behind one `RwLock`; `append_version` runs its checks and
//! writes inside a single write-lock critical section.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio_util::sync::CancellationToken;

use super::{CurrentEntry, FamilyRepository};
use crate::errors::{cancelled, ExError, ExErrorKind, FamlibError};
use crate::model::{Family, FamilyVersion};

#[derive(Debug, Default)]
struct MemoryState {
    families: HashMap<String, Family>,
    /// name -> family id
    names: HashMap<String, String>,
    /// family id -> versions, ascending
    versions: HashMap<String, Vec<FamilyVersion>>,
    /// hash -> (family id, version)
    hashes: HashMap<String, (String, u32)>,
}

impl MemoryState {
    fn version(&self, family_id: &str, version: u32) -> Option<&FamilyVersion> {
        self.versions
            .get(family_id)
            .and_then(|chain| chain.iter().find(|v| v.version == version))
    }

    fn head(&self, family_id: &str) -> Option<&FamilyVersion> {
        self.versions
            .get(family_id)
            .and_then(|chain| chain.iter().max_by_key(|v| v.version))
    }
}

/// Thread-safe in-memory [`FamilyRepository`]
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

fn poisoned() -> ExError {
    ExError::new(ExErrorKind::Internal).with_message("repository lock poisoned")
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, ExError> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, ExError> {
        self.state.write().map_err(|_| poisoned())
    }
}

impl FamilyRepository for MemoryRepository {
    fn create_family(&self, family: &Family) -> Result<(), ExError> {
        let mut state = self.write()?;
        if state.families.contains_key(&family.id) || state.names.contains_key(&family.name) {
            return Err(ExError::from(FamlibError::FamilyAlreadyExists {
                name: family.name.clone(),
            })
            .with_op("create_family"));
        }
        state
            .names
            .insert(family.name.clone(), family.id.clone());
        state.families.insert(family.id.clone(), family.clone());
        Ok(())
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>, ExError> {
        Ok(self.read()?.families.get(family_id).cloned())
    }

    fn find_family_by_name(&self, name: &str) -> Result<Option<Family>, ExError> {
        let state = self.read()?;
        Ok(state
            .names
            .get(name)
            .and_then(|id| state.families.get(id))
            .cloned())
    }

    fn list_families(&self) -> Result<Vec<Family>, ExError> {
        let mut families: Vec<Family> = self.read()?.families.values().cloned().collect();
        families.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(families)
    }

    fn head_version(&self, family_id: &str) -> Result<Option<FamilyVersion>, ExError> {
        Ok(self.read()?.head(family_id).cloned())
    }

    fn get_version(
        &self,
        family_id: &str,
        version: u32,
    ) -> Result<Option<FamilyVersion>, ExError> {
        Ok(self.read()?.version(family_id, version).cloned())
    }

    fn list_versions(&self, family_id: &str) -> Result<Vec<FamilyVersion>, ExError> {
        let mut chain = self
            .read()?
            .versions
            .get(family_id)
            .cloned()
            .unwrap_or_default();
        chain.sort_by_key(|v| v.version);
        Ok(chain)
    }

    fn find_version_by_hash(&self, hash: &str) -> Result<Option<FamilyVersion>, ExError> {
        let state = self.read()?;
        Ok(state
            .hashes
            .get(hash)
            .and_then(|(family_id, version)| state.version(family_id, *version))
            .cloned())
    }

    fn find_family_version_by_hash(
        &self,
        family_id: &str,
        hash: &str,
    ) -> Result<Option<FamilyVersion>, ExError> {
        let state = self.read()?;
        Ok(state
            .hashes
            .get(hash)
            .filter(|(owner, _)| owner == family_id)
            .and_then(|(owner, version)| state.version(owner, *version))
            .cloned())
    }

    fn lookup_current(&self, name: &str) -> Result<Option<CurrentEntry>, ExError> {
        let state = self.read()?;
        let Some(family) = state.names.get(name).and_then(|id| state.families.get(id)) else {
            return Ok(None);
        };
        let head = state
            .version(&family.id, family.current_version)
            .cloned();
        Ok(Some(CurrentEntry {
            family: family.clone(),
            head,
        }))
    }

    fn append_version(
        &self,
        version: &FamilyVersion,
        expected_current: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ExError> {
        let mut state = self.write()?;

        let actual = state
            .families
            .get(&version.family_id)
            .map(|f| f.current_version)
            .ok_or_else(|| {
                ExError::from(FamlibError::FamilyNotFound {
                    family_id: version.family_id.clone(),
                })
                .with_op("append_version")
            })?;

        if actual != expected_current {
            return Err(ExError::from(FamlibError::ConcurrencyConflict {
                family_id: version.family_id.clone(),
                expected: expected_current,
                actual,
            })
            .with_op("append_version"));
        }

        if version.version != expected_current + 1 {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("append_version")
                .with_entity_id(&version.family_id)
                .with_version(version.version)
                .with_message(format!(
                    "version must directly follow {}",
                    expected_current
                )));
        }

        if let Some((owner, existing)) = state.hashes.get(&version.hash) {
            return Err(ExError::from(FamlibError::DuplicateContent {
                family_id: owner.clone(),
                existing_version: *existing,
                hash: version.hash.clone(),
            })
            .with_op("append_version"));
        }

        if cancel.is_cancelled() {
            return Err(cancelled("append_version"));
        }

        state.hashes.insert(
            version.hash.clone(),
            (version.family_id.clone(), version.version),
        );
        state
            .versions
            .entry(version.family_id.clone())
            .or_default()
            .push(version.clone());
        if let Some(family) = state.families.get_mut(&version.family_id) {
            family.current_version = version.version;
        }
        Ok(())
    }
}
