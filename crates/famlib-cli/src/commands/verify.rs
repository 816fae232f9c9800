//! `famlib verify` - check a family's version chain

use clap::Args;
use tokio_util::sync::CancellationToken;

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Family name
    #[arg(long)]
    pub family: String,
}

/// Prints every violation; any violation fails the command
pub fn execute(global: &GlobalArgs, args: VerifyArgs) -> CliResult {
    let lib = open_library(global)?;
    let family = lib.find_family(&args.family)?;
    let violations = lib.verify_chain(&family.id, &CancellationToken::new())?;

    if violations.is_empty() {
        println!("{}: chain OK ({} versions)", family.name, family.current_version);
        return Ok(());
    }

    for violation in &violations {
        println!("{}: {}", family.name, violation);
    }
    Err(format!("{} integrity violation(s) in {}", violations.len(), family.name).into())
}
