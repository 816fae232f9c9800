//! `famlib publish` - publish a new family version

use std::fs;
use std::path::PathBuf;

use clap::Args;
use famlib_core::diff::render_changelog;
use famlib_core::model::Snapshot;
use famlib_engine::PublishRequest;
use tokio_util::sync::CancellationToken;

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Family name
    #[arg(long)]
    pub family: String,

    /// Family archive to publish
    #[arg(long)]
    pub artifact: PathBuf,

    /// JSON file holding the structural snapshot
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Optional type catalog stored next to the artifact
    #[arg(long)]
    pub type_catalog: Option<PathBuf>,

    /// Commit message
    #[arg(long, short = 'm', default_value = "")]
    pub message: String,

    /// Who is publishing
    #[arg(long)]
    pub publisher: String,
}

pub fn execute(global: &GlobalArgs, args: PublishArgs) -> CliResult {
    let lib = open_library(global)?;
    let family = lib.find_family(&args.family)?;

    let artifact = fs::read(&args.artifact)
        .map_err(|e| format!("cannot read {}: {}", args.artifact.display(), e))?;
    let snapshot: Snapshot = serde_json::from_str(
        &fs::read_to_string(&args.snapshot)
            .map_err(|e| format!("cannot read {}: {}", args.snapshot.display(), e))?,
    )?;

    let mut request = PublishRequest::new(family.id, artifact, snapshot)
        .with_commit_message(args.message)
        .with_publisher(args.publisher);
    if let Some(path) = &args.type_catalog {
        let catalog =
            fs::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        request = request.with_type_catalog(catalog);
    }

    let outcome = lib.publish(&request, &CancellationToken::new())?;

    println!(
        "Published {} v{} ({})",
        family.name, outcome.version.version, outcome.version.hash
    );
    print!("{}", render_changelog(&outcome.changes));
    Ok(())
}
