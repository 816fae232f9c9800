//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partial blob

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Atomically write bytes to a file
///
/// The temp name is unique per call so concurrent writers of the same blob
/// cannot interleave within one temp file.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_blob_dir", e))?;
    }

    let temp_path = target_path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

    fs::write(&temp_path, content).map_err(|e| io_error("write_blob_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_blob_temp", e));
    }

    Ok(())
}
