use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Family - a reusable component definition with an evolving version chain
///
/// The family record is the only mutable piece of library state: its
/// `current_version` pointer advances by one on every publish, in the same
/// atomic unit that appends the version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Unique display name; client tools reconcile by this name
    pub name: String,

    /// Role owning the family
    pub role: String,

    /// Newest published version number, 0 before the first publish
    pub current_version: u32,

    pub created_at: DateTime<Utc>,
}

impl Family {
    /// Create an unpublished family with a fresh id
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            role: role.into(),
            current_version: 0,
            created_at,
        }
    }

    /// Whether anything has been published yet
    pub fn is_published(&self) -> bool {
        self.current_version > 0
    }
}
