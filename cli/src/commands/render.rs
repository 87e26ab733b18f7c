//! # shvar Render Command
//!
//! File: cli/src/commands/render.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `shvar render`, which mirrors a source directory into a target
//! directory, expanding every template file on the way (see
//! `core::templating`). The target defaults to `render.output_dir` from the
//! configuration; extensions default to `render.extensions`.
//!
//! ```bash
//! shvar render ./deploy-templates ./deploy -D ENV=staging
//! shvar render ./site --ext .in
//! ```
//!
use crate::commands::{self, SyntaxChoice, VarArgs};
use crate::common::store::StoreScope;
use crate::core::config;
use crate::core::error::{Result, ShvarError};
use crate::core::templating;
use clap::Parser;
use std::path::PathBuf;

/// Arguments for `shvar render`.
#[derive(Parser, Debug)]
#[command(about = "Render a directory of templates into a target directory")]
pub struct RenderArgs {
    /// Directory containing the templates
    source: PathBuf,
    /// Output directory (default: `render.output_dir` from configuration)
    target: Option<PathBuf>,
    /// Template file extension (repeatable, default: `render.extensions`)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
    /// Reference syntax to recognise (default: config, then platform)
    #[arg(long, value_enum)]
    syntax: Option<SyntaxChoice>,
    #[command(flatten)]
    vars: VarArgs,
}

pub async fn handle_render(args: RenderArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let target = match (&args.target, &cfg.render.output_dir) {
        (Some(target), _) => target.clone(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => anyhow::bail!(ShvarError::ArgumentParsing(
            "No target directory given and no render.output_dir configured.".to_string()
        )),
    };
    let extensions: Vec<&str> = if args.extensions.is_empty() {
        cfg.render.extensions.iter().map(String::as_str).collect()
    } else {
        args.extensions.iter().map(String::as_str).collect()
    };

    let options = commands::expand_options(args.syntax, &cfg);
    let mut store = args.vars.build_store(&cfg)?;
    let mut scope = StoreScope::new(&mut store);
    let summary = templating::render_template_directory(
        &args.source,
        &target,
        &mut scope,
        &options,
        &extensions,
    )?;

    println!(
        "Rendered {} template(s) and copied {} file(s) into {}",
        summary.rendered,
        summary.copied,
        target.display()
    );
    Ok(())
}
