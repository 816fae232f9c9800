//! Subcommand implementations

pub mod diff;
pub mod family;
pub mod hash;
pub mod history;
pub mod publish;
pub mod reconcile;
pub mod verify;

use std::path::PathBuf;

use clap::Args;
use famlib_core::config::LibraryConfig;
use famlib_core::logging_facility;
use famlib_engine::Library;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Library home directory (database and blobs)
    #[arg(long, global = true, default_value = ".famlib")]
    pub home: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Load configuration and start logging
pub fn load_config(global: &GlobalArgs) -> Result<LibraryConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => LibraryConfig::from_path(path)?,
        None => LibraryConfig::default(),
    };
    logging_facility::init(config.logging.profile);
    Ok(config)
}

pub fn open_library(global: &GlobalArgs) -> Result<Library, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    Ok(Library::open(&global.home, config)?)
}
