//! Error handling for famlib-store
//!
//! Wraps famlib-core ExError with store-specific helpers

use famlib_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::IntegrityViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a blob collision error
pub fn blob_collision(locator: &str) -> ExError {
    ExError::new(ExErrorKind::IntegrityViolation)
        .with_op("blob_put")
        .with_message(format!("Blob collision for locator {}", locator))
}

/// Create a missing blob error
pub fn blob_missing(locator: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("blob_get")
        .with_entity_id(locator)
        .with_message(format!("Blob not found for locator {}", locator))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Whether a SQLite error is a UNIQUE / PRIMARY KEY violation
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Create a decoding error for a stored column
pub fn corrupt_row(column: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("sqlite_decode")
        .with_message(format!("cannot decode column {}: {}", column, reason))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
