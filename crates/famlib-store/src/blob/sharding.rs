//! Shards blobs into subdirectories named after the first 2 hex characters
//! of the locator, keeping directory sizes bounded.

use std::path::{Path, PathBuf};

pub const BLOB_EXTENSION: &str = "blob";

/// For locator "abc123...", returns "<root>/ab/abc123.blob"
pub fn shard_path(root: &Path, locator: &str) -> PathBuf {
    let shard = &locator[..2.min(locator.len())];
    root.join(shard)
        .join(format!("{}.{}", locator, BLOB_EXTENSION))
}
