//! Snapshot differ
//!
//! Compares two structural snapshots and produces a categorized change set
//! for changelog display and storage on the version record.
//!
//! ## Entry point
//!
//! ```
//! use famlib_core::diff::{compute_diff, render_changelog};
//! use famlib_core::model::Snapshot;
//!
//! let v1 = Snapshot::new("Door-A").with_category("Doors");
//! let v2 = Snapshot::new("Door-A").with_category("Openings");
//! let changes = compute_diff(Some(&v1), &v2).unwrap();
//! assert!(changes.has_changes());
//! println!("{}", render_changelog(&changes));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical change sets.
//! - **Fixed emission order**: Name, Category, Types, Parameters, Geometry, AuxText.
//! - **All or nothing**: invalid snapshots fail before any item is produced.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, compute_version_changes};
pub use human_summary::render_changelog;
pub use model::{ChangeCategory, ChangeItem, ChangeKind, ChangeSet, ParameterChange, ScalarChange};
