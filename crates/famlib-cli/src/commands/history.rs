//! `famlib history` - list a family's versions

use clap::Args;
use famlib_core::diff::render_changelog;

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Family name
    #[arg(long)]
    pub family: String,

    /// Print each version's changelog
    #[arg(long)]
    pub changelog: bool,

    /// Emit JSON version records
    #[arg(long, conflicts_with = "changelog")]
    pub json: bool,
}

pub fn execute(global: &GlobalArgs, args: HistoryArgs) -> CliResult {
    let lib = open_library(global)?;
    let family = lib.find_family(&args.family)?;
    let versions = lib.history(&family.id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }

    for version in &versions {
        println!(
            "v{}\t{}\t{}\t{}\t{}",
            version.version,
            version.hash,
            version.published_at.to_rfc3339(),
            version.publisher,
            version.commit_message
        );
        if args.changelog {
            print!("{}", render_changelog(&version.changes));
        }
    }
    Ok(())
}
