//! # shvar Path Command Group
//!
//! File: cli/src/commands/path.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `shvar path`, a front end for `common::pathlist`. A child
//! process cannot change its parent's environment, so `add` and `remove`
//! print the new value and leave exporting it to the caller:
//!
//! ```bash
//! export PATH="$(shvar path add ~/.cargo/bin)"
//! export PATH="$(shvar path remove /opt/old/bin)"
//! shvar path list --var LD_LIBRARY_PATH
//! shvar path contains /usr/local/bin && echo present
//! ```
//!
//! Entries are compared with the platform's rules (`--platform` overrides the
//! detected one): trailing separators are ignored, and case is ignored on Windows.
//!
use crate::common::pathlist::{self, Position};
use crate::common::platform::Platform;
use crate::common::store::{EnvStore, MemoryStore};
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

/// Arguments for the `shvar path` command group.
#[derive(Parser, Debug)]
pub struct PathArgs {
    #[command(subcommand)]
    command: PathCommand,
    /// Path-list variable to operate on
    #[arg(long, default_value = "PATH", global = true)]
    var: String,
    /// Separator and comparison rules to use (default: host platform)
    #[arg(long, value_enum, global = true)]
    platform: Option<Platform>,
}

#[derive(Subcommand, Debug)]
enum PathCommand {
    /// Print one entry per line
    List,
    /// Insert an entry (moving it if present) and print the new value
    Add {
        entry: String,
        /// Add at the end instead of the front
        #[arg(long)]
        append: bool,
    },
    /// Remove every occurrence of an entry and print the new value
    Remove { entry: String },
    /// Exit with status 0 if the entry is present, 1 otherwise
    Contains { entry: String },
}

pub async fn handle_path(args: PathArgs) -> Result<()> {
    let platform = args.platform.unwrap_or_else(Platform::current);
    let mut store = MemoryStore::from_store(&EnvStore)?;
    let var = args.var.as_str();
    debug!("Path command on '{}' ({:?})", var, platform);

    match args.command {
        PathCommand::List => {
            for entry in pathlist::entries(&store, var, platform)? {
                println!("{}", entry);
            }
        }
        PathCommand::Add { entry, append } => {
            let position = if append {
                Position::Append
            } else {
                Position::Prepend
            };
            let value = pathlist::add(&mut store, var, &entry, position, platform)?;
            println!("{}", value);
        }
        PathCommand::Remove { entry } => {
            if !pathlist::remove(&mut store, var, &entry, platform)? {
                warn!("'{}' is not in {}", entry, var);
            }
            let entries = pathlist::entries(&store, var, platform)?;
            println!("{}", pathlist::join(&entries, platform));
        }
        PathCommand::Contains { entry } => {
            let entries = pathlist::entries(&store, var, platform)?;
            if !pathlist::contains(&entries, &entry, platform) {
                debug!("'{}' not found in {}", entry, var);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
