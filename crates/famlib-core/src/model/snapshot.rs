//! Structural snapshot attached to every published version

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::errors::{FamlibError, Result};

/// Named parameter value, optionally grouped for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Structural description of a family at one version
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Type names; a set, serialized sorted
    #[serde(default)]
    pub types: BTreeSet<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Set by the authoring tool when geometry was edited
    #[serde(default)]
    pub geometry_changed: bool,

    /// Digest of auxiliary text (notes, labels), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_text_hash: Option<String>,
}

impl Snapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.insert(type_name.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_geometry_changed(mut self, changed: bool) -> Self {
        self.geometry_changed = changed;
        self
    }

    pub fn with_aux_text_hash(mut self, hash: impl Into<String>) -> Self {
        self.aux_text_hash = Some(hash.into());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check structural rules
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` naming the first violation found.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(FamlibError::InvalidSnapshot { reason });

        if self.name.trim().is_empty() {
            return invalid("snapshot name must not be empty".to_string());
        }
        if self.types.iter().any(|t| t.trim().is_empty()) {
            return invalid("type names must not be empty".to_string());
        }

        let mut seen = HashSet::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            if parameter.name.trim().is_empty() {
                return invalid("parameter names must not be empty".to_string());
            }
            if !seen.insert(parameter.name.as_str()) {
                return invalid(format!("duplicate parameter '{}'", parameter.name));
            }
        }

        if let Some(hash) = &self.aux_text_hash {
            if hash.trim().is_empty() {
                return invalid("aux_text_hash must not be empty when present".to_string());
            }
        }
        Ok(())
    }

    /// Copy with parameters ordered by name, the form stored on a version
    pub fn normalized(&self) -> Self {
        let mut snapshot = self.clone();
        snapshot.parameters.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
    }
}
