//! Batch reconciliation of client-held hashes
//!
//! Each item is classified on its own; a bad item or a failed lookup turns
//! into an `Unmatched` result, never into a batch failure. The engine runs
//! [`classify::classify_item`] across a bounded worker pool.

#![allow(clippy::result_large_err)]

pub mod classify;
pub mod legacy;

use serde::{Deserialize, Serialize};

pub use classify::classify_item;
pub use legacy::LegacyNamePolicy;

/// One client-held copy to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileItem {
    /// Family name as known to the client
    pub identifier: String,
    pub local_hash: String,
    /// Version number the client believes it holds, if stamped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_version: Option<u32>,
}

impl ReconcileItem {
    pub fn new(identifier: impl Into<String>, local_hash: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            local_hash: local_hash.into(),
            local_version: None,
        }
    }

    pub fn with_local_version(mut self, version: u32) -> Self {
        self.local_version = Some(version);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// Local copy is the current version
    UpToDate,
    /// Local copy is an older published version
    UpdateAvailable,
    /// Hash matches no version, but the identifier follows a legacy naming convention
    LegacyMatch,
    /// Nothing in the library corresponds to the item
    Unmatched,
    /// Local copy claims a newer version than the library has published
    LocalModified,
}

impl ReconcileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileStatus::UpToDate => "up_to_date",
            ReconcileStatus::UpdateAvailable => "update_available",
            ReconcileStatus::LegacyMatch => "legacy_match",
            ReconcileStatus::Unmatched => "unmatched",
            ReconcileStatus::LocalModified => "local_modified",
        }
    }
}

impl std::fmt::Display for ReconcileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub identifier: String,
    pub local_hash: String,
    pub status: ReconcileStatus,
    /// Library's current version, when the family exists
    pub library_version: Option<u32>,
    /// Hash of the library's current version, when one is published
    pub library_hash: Option<String>,
    /// Version whose hash equals the local hash
    pub matched_version: Option<u32>,
}

impl ReconciliationResult {
    pub fn unmatched(item: &ReconcileItem) -> Self {
        Self {
            identifier: item.identifier.clone(),
            local_hash: item.local_hash.clone(),
            status: ReconcileStatus::Unmatched,
            library_version: None,
            library_hash: None,
            matched_version: None,
        }
    }
}
