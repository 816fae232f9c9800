//! Engine-level commands for callers that dispatch on data
//!
//! A CLI, an HTTP layer or an embedding application builds an
//! [`EngineCommand`] and hands it to [`apply_engine_command`]; each variant
//! maps onto one [`Library`] operation.

#![allow(clippy::result_large_err)]

use famlib_core::chain::IntegrityViolation;
use famlib_core::diff::ChangeSet;
use famlib_core::errors::ExError;
use famlib_core::model::{Family, FamilyVersion, Snapshot};
use famlib_core::reconcile::{ReconcileItem, ReconciliationResult};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::publish::{PublishOutcome, PublishRequest};
use crate::Library;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommand {
    CreateFamily {
        name: String,
        role: String,
    },
    ListFamilies,
    Publish(PublishRequest),
    VerifyChain {
        family_id: String,
    },
    Reconcile {
        items: Vec<ReconcileItem>,
    },
    Diff {
        previous: Option<Snapshot>,
        current: Snapshot,
    },
    DiffVersions {
        family_id: String,
        from: Option<u32>,
        to: u32,
    },
    History {
        family_id: String,
    },
    FetchArtifact {
        family_id: String,
        version: u32,
    },
}

/// Result of applying an engine command, one variant per command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EngineCommandResult {
    FamilyCreated(Family),
    Families { families: Vec<Family> },
    Published(PublishOutcome),
    ChainVerified { violations: Vec<IntegrityViolation> },
    Reconciled { results: Vec<ReconciliationResult> },
    Diff(ChangeSet),
    History { versions: Vec<FamilyVersion> },
    Artifact { bytes: Vec<u8> },
}

/// Apply an engine command against a library
///
/// # Errors
///
/// Whatever the underlying operation returns.
pub fn apply_engine_command(
    cmd: EngineCommand,
    lib: &Library,
    cancel: &CancellationToken,
) -> Result<EngineCommandResult, ExError> {
    match cmd {
        EngineCommand::CreateFamily { name, role } => lib
            .create_family(&name, &role)
            .map(EngineCommandResult::FamilyCreated),
        EngineCommand::ListFamilies => lib
            .list_families()
            .map(|families| EngineCommandResult::Families { families }),
        EngineCommand::Publish(request) => lib
            .publish(&request, cancel)
            .map(EngineCommandResult::Published),
        EngineCommand::VerifyChain { family_id } => lib
            .verify_chain(&family_id, cancel)
            .map(|violations| EngineCommandResult::ChainVerified { violations }),
        EngineCommand::Reconcile { items } => lib
            .reconcile(&items, cancel)
            .map(|results| EngineCommandResult::Reconciled { results }),
        EngineCommand::Diff { previous, current } => lib
            .diff(previous.as_ref(), &current, cancel)
            .map(EngineCommandResult::Diff),
        EngineCommand::DiffVersions {
            family_id,
            from,
            to,
        } => lib
            .diff_versions(&family_id, from, to, cancel)
            .map(EngineCommandResult::Diff),
        EngineCommand::History { family_id } => lib
            .history(&family_id)
            .map(|versions| EngineCommandResult::History { versions }),
        EngineCommand::FetchArtifact { family_id, version } => lib
            .fetch_artifact(&family_id, version)
            .map(|bytes| EngineCommandResult::Artifact { bytes }),
    }
}
