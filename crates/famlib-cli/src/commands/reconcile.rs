//! `famlib reconcile` - classify client-held hashes

use std::fs;
use std::path::PathBuf;

use clap::Args;
use famlib_core::reconcile::ReconcileItem;
use tokio_util::sync::CancellationToken;

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// JSON array of `{identifier, local_hash, local_version?}` items
    #[arg(long)]
    pub items: PathBuf,
}

/// Results go to stdout as a JSON array in input order
pub fn execute(global: &GlobalArgs, args: ReconcileArgs) -> CliResult {
    let text = fs::read_to_string(&args.items)
        .map_err(|e| format!("cannot read {}: {}", args.items.display(), e))?;
    let items: Vec<ReconcileItem> = serde_json::from_str(&text)?;

    let lib = open_library(global)?;
    let results = lib.reconcile(&items, &CancellationToken::new())?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
