//! SQLite repository implementation
//!
//! Persists families and their version chains. Snapshots and change sets are
//! stored as JSON text; timestamps as Unix milliseconds.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::db;
use crate::errors::{from_rusqlite, is_unique_violation, Result};
use crate::migrations::apply_migrations;
use crate::repo::rows::{to_millis, FamilyRow, VersionRow, FAMILY_COLUMNS, VERSION_COLUMNS};
use famlib_core::errors::{cancelled, ExError, ExErrorKind, FamlibError};
use famlib_core::model::{Family, FamilyVersion};
use famlib_core::repo::{CurrentEntry, FamilyRepository};
use rusqlite::{params, Connection, OptionalExtension, Params, TransactionBehavior};
use tokio_util::sync::CancellationToken;

/// Durable [`FamilyRepository`] over one SQLite connection
///
/// The connection sits behind a mutex; cross-process writers are serialized
/// by `BEGIN IMMEDIATE` in [`FamilyRepository::append_version`].
///
/// Reads take the same lock, so concurrent lookups through one repository
/// run one at a time. Batch reconcile fans lookups out over a worker pool;
/// on this backend the pool bounds the batch but adds no read parallelism.
/// Open one repository per reader when lookup throughput matters.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal).with_message("repository connection lock poisoned")
        })
    }
}

fn query_family<P: Params>(conn: &Connection, filter: &str, params: P) -> Result<Option<Family>> {
    let sql = format!("SELECT {} FROM families WHERE {}", FAMILY_COLUMNS, filter);
    conn.query_row(&sql, params, FamilyRow::read)
        .optional()
        .map_err(from_rusqlite)?
        .map(FamilyRow::decode)
        .transpose()
}

fn query_version<P: Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> Result<Option<FamilyVersion>> {
    let sql = format!(
        "SELECT {} FROM family_versions WHERE {}",
        VERSION_COLUMNS, filter
    );
    conn.query_row(&sql, params, VersionRow::read)
        .optional()
        .map_err(from_rusqlite)?
        .map(VersionRow::decode)
        .transpose()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ExError::from(FamlibError::from(e)))
}

/// `DuplicateContent` naming the owner if `hash` is already stored
fn duplicate_of(conn: &Connection, hash: &str) -> Result<Option<ExError>> {
    let owner: Option<(String, u32)> = conn
        .query_row(
            "SELECT family_id, version FROM family_versions WHERE hash = ?1",
            [hash],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(owner.map(|(family_id, existing_version)| {
        ExError::from(FamlibError::DuplicateContent {
            family_id,
            existing_version,
            hash: hash.to_string(),
        })
        .with_op("append_version")
    }))
}

fn conflict(family_id: &str, expected: u32, actual: u32) -> ExError {
    ExError::from(FamlibError::ConcurrencyConflict {
        family_id: family_id.to_string(),
        expected,
        actual,
    })
    .with_op("append_version")
}

impl FamilyRepository for SqliteRepository {
    fn create_family(&self, family: &Family) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO families (id, name, role, current_version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                family.id,
                family.name,
                family.role,
                family.current_version,
                to_millis(&family.created_at),
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                ExError::from(FamlibError::FamilyAlreadyExists {
                    name: family.name.clone(),
                })
                .with_op("create_family")
            } else {
                from_rusqlite(e)
            }
        })?;
        Ok(())
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        query_family(&*self.lock()?, "id = ?1", [family_id])
    }

    fn find_family_by_name(&self, name: &str) -> Result<Option<Family>> {
        query_family(&*self.lock()?, "name = ?1", [name])
    }

    fn list_families(&self) -> Result<Vec<Family>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM families ORDER BY name", FAMILY_COLUMNS);
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], FamilyRow::read)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(FamilyRow::decode).collect()
    }

    fn head_version(&self, family_id: &str) -> Result<Option<FamilyVersion>> {
        query_version(
            &*self.lock()?,
            "family_id = ?1 ORDER BY version DESC LIMIT 1",
            [family_id],
        )
    }

    fn get_version(&self, family_id: &str, version: u32) -> Result<Option<FamilyVersion>> {
        query_version(
            &*self.lock()?,
            "family_id = ?1 AND version = ?2",
            params![family_id, version],
        )
    }

    fn list_versions(&self, family_id: &str) -> Result<Vec<FamilyVersion>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM family_versions WHERE family_id = ?1 ORDER BY version",
            VERSION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([family_id], VersionRow::read)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(VersionRow::decode).collect()
    }

    fn find_version_by_hash(&self, hash: &str) -> Result<Option<FamilyVersion>> {
        query_version(&*self.lock()?, "hash = ?1", [hash])
    }

    fn find_family_version_by_hash(
        &self,
        family_id: &str,
        hash: &str,
    ) -> Result<Option<FamilyVersion>> {
        query_version(
            &*self.lock()?,
            "family_id = ?1 AND hash = ?2",
            params![family_id, hash],
        )
    }

    fn lookup_current(&self, name: &str) -> Result<Option<CurrentEntry>> {
        let conn = self.lock()?;
        let Some(family) = query_family(&conn, "name = ?1", [name])? else {
            return Ok(None);
        };
        let head = query_version(
            &conn,
            "family_id = ?1 AND version = ?2",
            params![family.id, family.current_version],
        )?;
        Ok(Some(CurrentEntry { family, head }))
    }

    fn append_version(
        &self,
        version: &FamilyVersion,
        expected_current: u32,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let actual: u32 = tx
            .query_row(
                "SELECT current_version FROM families WHERE id = ?1",
                [&version.family_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?
            .ok_or_else(|| {
                ExError::from(FamlibError::FamilyNotFound {
                    family_id: version.family_id.clone(),
                })
                .with_op("append_version")
            })?;

        if actual != expected_current {
            return Err(conflict(&version.family_id, expected_current, actual));
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

        if let Some(err) = duplicate_of(&tx, &version.hash)? {
            return Err(err);
        }

        let snapshot = to_json(&version.snapshot)?;
        let changes = to_json(&version.changes)?;

        let inserted = tx.execute(
            &format!(
                "INSERT INTO family_versions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                VERSION_COLUMNS
            ),
            params![
                version.family_id,
                version.version,
                version.hash,
                version.previous_hash,
                version.artifact_locator,
                version.type_catalog_locator,
                version.commit_message,
                to_millis(&version.published_at),
                version.publisher,
                snapshot,
                changes,
            ],
        );
        if let Err(e) = inserted {
            if !is_unique_violation(&e) {
                return Err(from_rusqlite(e));
            }
            return Err(match duplicate_of(&tx, &version.hash)? {
                Some(err) => err,
                None => conflict(&version.family_id, expected_current, version.version),
            });
        }

        let moved = tx
            .execute(
                "UPDATE families SET current_version = ?1 WHERE id = ?2 AND current_version = ?3",
                params![version.version, version.family_id, expected_current],
            )
            .map_err(from_rusqlite)?;
        if moved != 1 {
            return Err(conflict(&version.family_id, expected_current, actual));
        }

        // Dropping the transaction rolls everything back
        if cancel.is_cancelled() {
            return Err(cancelled("append_version"));
        }

        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(
            family_id = %version.family_id,
            version = version.version,
            "version appended"
        );
        Ok(())
    }
}
