//! Change set types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections are ordered `Vec`s so serialized change sets are stable.

use serde::{Deserialize, Serialize};

/// Direction of a single change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

/// Category a change item belongs to, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    Name,
    Category,
    Types,
    Parameters,
    Geometry,
    AuxText,
}

/// Change to a single-valued field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarChange {
    pub kind: ChangeKind,
    pub previous: Option<String>,
    pub current: Option<String>,
}

impl ScalarChange {
    pub fn added(current: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Added,
            previous: None,
            current: Some(current.into()),
        }
    }

    pub fn changed(previous: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Changed,
            previous: Some(previous.into()),
            current: Some(current.into()),
        }
    }

    pub fn removed(previous: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Removed,
            previous: Some(previous.into()),
            current: None,
        }
    }
}

/// Change to one named parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub name: String,
    pub kind: ChangeKind,
    pub previous: Option<String>,
    pub current: Option<String>,
}

/// One categorized entry of a change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ChangeItem {
    Name(ScalarChange),
    Category(ScalarChange),
    /// Sorted type names entering and leaving the set
    Types {
        added: Vec<String>,
        removed: Vec<String>,
    },
    Parameters {
        changes: Vec<ParameterChange>,
    },
    Geometry {
        kind: ChangeKind,
    },
    AuxText(ScalarChange),
}

impl ChangeItem {
    pub fn category(&self) -> ChangeCategory {
        match self {
            ChangeItem::Name(_) => ChangeCategory::Name,
            ChangeItem::Category(_) => ChangeCategory::Category,
            ChangeItem::Types { .. } => ChangeCategory::Types,
            ChangeItem::Parameters { .. } => ChangeCategory::Parameters,
            ChangeItem::Geometry { .. } => ChangeCategory::Geometry,
            ChangeItem::AuxText(_) => ChangeCategory::AuxText,
        }
    }
}

/// Ordered list of change items, at most one per category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub items: Vec<ChangeItem>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// False iff there are no items
    pub fn has_changes(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, category: ChangeCategory) -> Option<&ChangeItem> {
        self.items.iter().find(|item| item.category() == category)
    }

    pub fn categories(&self) -> Vec<ChangeCategory> {
        self.items.iter().map(ChangeItem::category).collect()
    }

    /// Parameter changes, empty when parameters did not change
    pub fn parameter_changes(&self) -> &[ParameterChange] {
        match self.get(ChangeCategory::Parameters) {
            Some(ChangeItem::Parameters { changes }) => changes,
            _ => &[],
        }
    }
}
