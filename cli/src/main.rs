//! # shvar Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file serves as the main entry point for the shvar CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`expand`, `render`, `path`, `vars`) is a variant
//!   in the `Commands` enum, handled by a function in its `commands::` module
//! - The expansion engine itself lives in `core::expand` and knows nothing
//!   about the CLI; commands wire it to a variable store from `common::store`
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Expand a string against the environment
//! shvar expand 'Deploying ${APP:-app} to ${ENV:?ENV must be set}'
//!
//! # Render a template directory with extra definitions, verbosely
//! shvar -vv render ./templates ./out -D VERSION=1.4.2
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (expand, render, path, vars)
mod common; // Variable stores, path lists, platform detection
mod core; // Expansion engine, errors, config, templating

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "shvar",
    about = "Shell-style variable expansion for strings, files, and template trees",
    long_about = "Expands ${VAR}, $VAR and %VAR% references with the POSIX parameter operators\n\
                  (-, :-, =, :=, +, :+, ?, :?) against the environment, project configuration,\n\
                  and command-line definitions.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "x")]
    Expand(commands::expand::ExpandArgs),
    #[command(alias = "r")]
    Render(commands::render::RenderArgs),
    Path(commands::path::PathArgs),
    Vars(commands::vars::VarsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Expand(args) => commands::expand::handle_expand(args).await,
        Commands::Render(args) => commands::render::handle_render(args).await,
        Commands::Path(args) => commands::path::handle_path(args).await,
        Commands::Vars(args) => commands::vars::handle_vars(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
