//! # shvar Vars Command
//!
//! File: cli/src/commands/vars.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `shvar vars`: prints the variable table a template would be
//! expanded against (environment, then `[vars]` from configuration, then
//! `-D` definitions), one sorted `NAME=VALUE` line per variable. Useful for
//! checking what a project's `.shvar.toml` contributes.
//!
use crate::commands::VarArgs;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;

/// Arguments for `shvar vars`.
#[derive(Parser, Debug)]
#[command(about = "Print the merged variable table as NAME=VALUE lines")]
pub struct VarsArgs {
    #[command(flatten)]
    vars: VarArgs,
}

pub async fn handle_vars(args: VarsArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let store = args.vars.build_store(&cfg)?;
    for (name, value) in store.iter() {
        println!("{}={}", name, value);
    }
    Ok(())
}
