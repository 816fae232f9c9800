use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::Snapshot;
use crate::diff::ChangeSet;

/// One immutable entry of a family's version chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyVersion {
    pub family_id: String,

    /// 1-based, contiguous within the family
    pub version: u32,

    /// Digest of the artifact's canonical bytes
    pub hash: String,

    /// Hash of version N-1; `None` only for version 1
    pub previous_hash: Option<String>,

    /// Blob store locator of the raw artifact
    pub artifact_locator: String,

    /// Blob store locator of the type catalog, when one was published
    pub type_catalog_locator: Option<String>,

    pub commit_message: String,

    pub published_at: DateTime<Utc>,

    pub publisher: String,

    pub snapshot: Snapshot,

    /// Changes against the previous version's snapshot, computed at publish time
    pub changes: ChangeSet,
}

impl FamilyVersion {
    pub fn is_genesis(&self) -> bool {
        self.version == 1
    }
}
