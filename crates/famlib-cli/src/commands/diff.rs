//! `famlib diff` - compare two stored versions

use clap::Args;
use famlib_core::diff::render_changelog;
use tokio_util::sync::CancellationToken;

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Family name
    #[arg(long)]
    pub family: String,

    /// Older version; omit to diff against nothing
    #[arg(long)]
    pub from: Option<u32>,

    /// Newer version
    #[arg(long)]
    pub to: u32,

    /// Emit the change set as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(global: &GlobalArgs, args: DiffArgs) -> CliResult {
    let lib = open_library(global)?;
    let family = lib.find_family(&args.family)?;
    let changes = lib.diff_versions(&family.id, args.from, args.to, &CancellationToken::new())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        print!("{}", render_changelog(&changes));
    }
    Ok(())
}
