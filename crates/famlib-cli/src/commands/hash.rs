//! `famlib hash` - canonical hash of a local archive

use std::fs;
use std::path::PathBuf;

use clap::Args;
use famlib_core::canonical::hash_artifact;

use super::{load_config, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct HashArgs {
    /// Family archive
    pub path: PathBuf,
}

pub fn execute(global: &GlobalArgs, args: HashArgs) -> CliResult {
    let config = load_config(global)?;
    let bytes =
        fs::read(&args.path).map_err(|e| format!("cannot read {}: {}", args.path.display(), e))?;
    println!("{}", hash_artifact(&bytes, &config.canonical)?);
    Ok(())
}
