//! Version chain integrity
//!
//! Each version links to its predecessor by hash; the family pointer names
//! the newest version. [`verify::verify_versions`] reports every place where
//! persisted history breaks those rules. It never repairs anything.

pub mod verify;

pub use verify::{verify_versions, IntegrityViolation};
