//! famlib CLI
//!
//! Command-line interface for a family library stored under `--home`

use clap::{Parser, Subcommand};

mod commands;

use commands::GlobalArgs;

#[derive(Debug, Parser)]
#[command(name = "famlib")]
#[command(about = "famlib - content-addressed family version library", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Family registration and listing
    Family(commands::family::FamilyArgs),
    /// Publish a new version of a family
    Publish(commands::publish::PublishArgs),
    /// Show a family's version history
    History(commands::history::HistoryArgs),
    /// Diff two stored versions
    Diff(commands::diff::DiffArgs),
    /// Verify a family's version chain
    Verify(commands::verify::VerifyArgs),
    /// Reconcile client-held hashes from a JSON file
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Print the canonical hash of a local artifact
    Hash(commands::hash::HashArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Family(args) => commands::family::execute(&cli.global, args),
        Commands::Publish(args) => commands::publish::execute(&cli.global, args),
        Commands::History(args) => commands::history::execute(&cli.global, args),
        Commands::Diff(args) => commands::diff::execute(&cli.global, args),
        Commands::Verify(args) => commands::verify::execute(&cli.global, args),
        Commands::Reconcile(args) => commands::reconcile::execute(&cli.global, args),
        Commands::Hash(args) => commands::hash::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
