//! Repository layer persisting families and version chains to SQLite

mod rows;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepository;
