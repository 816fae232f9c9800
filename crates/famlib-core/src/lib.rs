//! famlib core - content-addressed version store kernel
//!
//! This crate provides the pure building blocks of the family library:
//! - Artifact canonicalization and content hashing
//! - Structural snapshots and the category-grouped snapshot differ
//! - Version chain verification
//! - Per-item reconciliation classification
//! - Repository and blob store seams, with in-memory implementations
//! - The error and logging facilities shared by every crate

pub mod blob;
pub mod canonical;
pub mod chain;
pub mod clock;
pub mod config;
pub mod diff;
pub mod digest;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod repo;

// Used by the logging macros
#[doc(hidden)]
pub use famlib_core_types;

// Re-export commonly used types
pub use blob::{BlobStore, MemoryBlobStore};
pub use canonical::{canonicalize, hash_artifact};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LibraryConfig;
pub use diff::{compute_diff, render_changelog, ChangeSet};
pub use errors::{ExError, ExErrorKind, FamlibError, Result};
pub use model::{Family, FamilyVersion, Parameter, Snapshot};
pub use repo::{CurrentEntry, FamilyRepository, MemoryRepository};
