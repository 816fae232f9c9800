//! famlib store - persistence layer with SQLite and filesystem blobs
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteRepository`, the durable `FamilyRepository`
//! - `FsBlobStore`, content-addressed artifact storage on disk

pub mod blob;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use blob::FsBlobStore;
pub use errors::Result;
pub use repo::SqliteRepository;
