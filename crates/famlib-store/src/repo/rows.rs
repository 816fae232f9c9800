//! Row decoding for the families and family_versions tables
//!
//! Closures passed to rusqlite only copy raw column values; decoding into
//! domain types happens afterwards so failures surface as `ExError`.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_row, Result};
use chrono::{DateTime, TimeZone, Utc};
use famlib_core::model::{Family, FamilyVersion};
use rusqlite::Row;

pub const FAMILY_COLUMNS: &str = "id, name, role, current_version, created_at";

pub const VERSION_COLUMNS: &str = "family_id, version, hash, previous_hash, artifact_locator, \
     type_catalog_locator, commit_message, published_at, publisher, snapshot, changes";

pub fn to_millis(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| corrupt_row(column, format!("timestamp {} out of range", millis)))
}

fn to_u32(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|e| corrupt_row(column, e))
}

pub struct FamilyRow {
    id: String,
    name: String,
    role: String,
    current_version: i64,
    created_at: i64,
}

impl FamilyRow {
    pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            current_version: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    pub fn decode(self) -> Result<Family> {
        Ok(Family {
            id: self.id,
            name: self.name,
            role: self.role,
            current_version: to_u32("current_version", self.current_version)?,
            created_at: from_millis("created_at", self.created_at)?,
        })
    }
}

pub struct VersionRow {
    family_id: String,
    version: i64,
    hash: String,
    previous_hash: Option<String>,
    artifact_locator: String,
    type_catalog_locator: Option<String>,
    commit_message: String,
    published_at: i64,
    publisher: String,
    snapshot: String,
    changes: String,
}

impl VersionRow {
    pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            family_id: row.get(0)?,
            version: row.get(1)?,
            hash: row.get(2)?,
            previous_hash: row.get(3)?,
            artifact_locator: row.get(4)?,
            type_catalog_locator: row.get(5)?,
            commit_message: row.get(6)?,
            published_at: row.get(7)?,
            publisher: row.get(8)?,
            snapshot: row.get(9)?,
            changes: row.get(10)?,
        })
    }

    pub fn decode(self) -> Result<FamilyVersion> {
        Ok(FamilyVersion {
            family_id: self.family_id,
            version: to_u32("version", self.version)?,
            hash: self.hash,
            previous_hash: self.previous_hash,
            artifact_locator: self.artifact_locator,
            type_catalog_locator: self.type_catalog_locator,
            commit_message: self.commit_message,
            published_at: from_millis("published_at", self.published_at)?,
            publisher: self.publisher,
            snapshot: serde_json::from_str(&self.snapshot)
                .map_err(|e| corrupt_row("snapshot", e))?,
            changes: serde_json::from_str(&self.changes).map_err(|e| corrupt_row("changes", e))?,
        })
    }
}
