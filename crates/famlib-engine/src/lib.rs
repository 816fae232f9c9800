//! famlib engine - orchestration layer
//!
//! Coordinates the pure core (canonicalizer, differ, verifier, classifier)
//! with a repository and a blob store behind the [`Library`] facade, and
//! offers the same operations as data through [`EngineCommand`].

pub mod commands;
pub mod library;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::publish::{PublishOutcome, PublishRequest};
pub use library::Library;
