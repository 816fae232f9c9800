//! `famlib family` - register and list families

use clap::{Args, Subcommand};

use super::{open_library, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct FamilyArgs {
    #[command(subcommand)]
    pub action: FamilyAction,
}

#[derive(Debug, Subcommand)]
pub enum FamilyAction {
    /// Register a new, unpublished family
    Create {
        /// Unique family name
        #[arg(long)]
        name: String,

        /// Discipline or role the family belongs to
        #[arg(long, default_value = "general")]
        role: String,
    },
    /// List families with their current version
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(global: &GlobalArgs, args: FamilyArgs) -> CliResult {
    let lib = open_library(global)?;

    match args.action {
        FamilyAction::Create { name, role } => {
            let family = lib.create_family(&name, &role)?;
            println!("Created family {} ({})", family.name, family.id);
        }
        FamilyAction::List { json } => {
            let families = lib.list_families()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&families)?);
            } else {
                for family in families {
                    println!(
                        "{}\tv{}\t{}\t{}",
                        family.name, family.current_version, family.role, family.id
                    );
                }
            }
        }
    }

    Ok(())
}
