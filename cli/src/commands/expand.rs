//! # shvar Expand Command
//!
//! File: cli/src/commands/expand.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `shvar expand`, the command-line front end of the expansion
//! engine. The template comes from one of:
//! - positional arguments (joined with newlines, result printed with a trailing newline)
//! - `--file <PATH>` (`-` for stdin), printed exactly as expanded
//! - stdin, when neither is given
//!
//! With `--export`, every variable assigned by a `=` / `:=` reference is
//! printed to stderr as `NAME=VALUE`, so a caller can persist the defaults.
//!
//! ## Examples
//!
//! ```bash
//! shvar expand 'Hello ${USER:-stranger}'
//! shvar expand --syntax both -D DIR=/opt '%DIR%/bin:$PATH'
//! shvar expand -f config.ini.tmpl > config.ini
//! echo '${PORT:=8080}' | shvar expand --export
//! ```
//!
use crate::commands::{self, SyntaxChoice, VarArgs};
use crate::common::store::StoreScope;
use crate::core::config;
use crate::core::error::Result;
use crate::core::expand;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Arguments for `shvar expand`.
#[derive(Parser, Debug)]
#[command(
    about = "Expand ${VAR} / $VAR / %VAR% references in text",
    long_about = "Expands variable references in the given templates, a file, or stdin.\n\
                  Supports the ${NAME-x} ${NAME:-x} ${NAME=x} ${NAME:=x} ${NAME+x} ${NAME:+x}\n\
                  ${NAME?msg} and ${NAME:?msg} operators."
)]
pub struct ExpandArgs {
    /// Templates to expand (joined with newlines)
    #[arg(value_name = "TEMPLATE", conflicts_with = "file")]
    templates: Vec<String>,
    /// Read the template from a file (`-` for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Reference syntax to recognise (default: config, then platform)
    #[arg(long, value_enum)]
    syntax: Option<SyntaxChoice>,
    /// Print variables assigned by `=` / `:=` to stderr as NAME=VALUE
    #[arg(long)]
    export: bool,
    #[command(flatten)]
    vars: VarArgs,
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .context("Failed to read template from stdin")?;
    Ok(content)
}

async fn read_template_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return read_stdin().await;
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read template file: {}", path.display()))
}

pub async fn handle_expand(args: ExpandArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let options = commands::expand_options(args.syntax, &cfg);
    let mut store = args.vars.build_store(&cfg)?;

    let (template, add_newline) = match (&args.file, args.templates.is_empty()) {
        (Some(path), _) => (read_template_file(path).await?, false),
        (None, false) => (args.templates.join("\n"), true),
        (None, true) => {
            debug!("No template arguments, reading stdin");
            (read_stdin().await?, false)
        }
    };

    let mut scope = StoreScope::new(&mut store);
    let expanded = expand::expand(&template, &mut scope, &options)?;
    info!(
        "Expanded {} bytes into {} bytes",
        template.len(),
        expanded.len()
    );

    if add_newline {
        println!("{}", expanded);
    } else {
        print!("{}", expanded);
    }
    if args.export {
        for (name, value) in scope.assignments() {
            eprintln!("{}={}", name, value);
        }
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_template_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.tmpl");
        std::fs::write(&path, "${A}\n").unwrap();
        assert_eq!(read_template_file(&path).await.unwrap(), "${A}\n");

        let err = read_template_file(&dir.path().join("missing")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read template file"));
    }

    #[test]
    fn test_templates_conflict_with_file() {
        let result = ExpandArgs::try_parse_from(["expand", "x", "--file", "y"]);
        assert!(result.is_err());
        let args = ExpandArgs::try_parse_from(["expand", "-D", "A=1", "--no-env", "a", "b"]).unwrap();
        assert_eq!(args.templates, vec!["a", "b"]);
        assert!(args.vars.no_env);
        assert_eq!(args.vars.defines, vec![("A".to_string(), "1".to_string())]);
    }
}
