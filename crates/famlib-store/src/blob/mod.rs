//! Filesystem blob storage
//!
//! Provides:
//! - Content addressing by SHA-256 of the raw bytes
//! - Atomic writes and collision detection
//! - Sharding by first 2 hex chars of the locator

mod atomic;
mod fs_store;
mod sharding;

pub use fs_store::FsBlobStore;
