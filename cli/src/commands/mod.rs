//! # shvar Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates all top-level commands of the shvar CLI and the
//! argument groups they share.
//!
//! ## Command Groups
//!
//! - `expand`: Expand template strings, a file, or stdin
//! - `render`: Expand a directory tree of template files
//! - `path`: Inspect and edit `PATH`-style variables
//! - `vars`: Print the variable set a template would see
//!
//! ## Shared Arguments
//!
//! `VarArgs` builds the variable table every command expands against. Layers,
//! later ones winning:
//! 1. The process environment (unless `--no-env` or `inherit_env = false`)
//! 2. `[vars]` from the configuration files
//! 3. `-D NAME=VALUE` definitions on the command line
//!
use crate::common::platform::Platform;
use crate::common::store::{EnvStore, MemoryStore};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::expand::ExpandOptions;
use clap::{Args, ValueEnum};
use tracing::debug;

/// Expands templates given as arguments, a file, or stdin.
pub mod expand;
/// Edits `PATH`-style variables and prints the result.
pub mod path;
/// Renders a directory of templates into a target directory.
pub mod render;
/// Lists the merged variable table.
pub mod vars;

/// Arguments that seed the variable table.
#[derive(Args, Debug, Default, Clone)]
pub struct VarArgs {
    /// Define a variable (repeatable), e.g. `-D NAME=value`
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_definition)]
    pub defines: Vec<(String, String)>,
    /// Do not start from the process environment
    #[arg(long)]
    pub no_env: bool,
}

impl VarArgs {
    pub fn build_store(&self, cfg: &Config) -> Result<MemoryStore> {
        let mut store = if cfg.inherit_env && !self.no_env {
            MemoryStore::from_store(&EnvStore)?
        } else {
            debug!("Starting from an empty variable table");
            MemoryStore::new()
        };
        store.extend(cfg.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        store.extend(self.defines.iter().cloned());
        debug!("Variable table holds {} entries", store.len());
        Ok(store)
    }
}

/// Reference syntax selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyntaxChoice {
    /// `$NAME` and `${NAME...}`
    Posix,
    /// `%NAME%`
    Windows,
    /// All of the above
    Both,
}

/// The `--syntax` flag wins over configuration, which wins over the platform default.
pub fn expand_options(choice: Option<SyntaxChoice>, cfg: &Config) -> ExpandOptions {
    match choice {
        Some(SyntaxChoice::Posix) => ExpandOptions::posix(),
        Some(SyntaxChoice::Windows) => ExpandOptions::windows(),
        Some(SyntaxChoice::Both) => ExpandOptions::both(),
        None => cfg.syntax.to_options(Platform::current()),
    }
}

fn parse_definition(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    if !config::is_valid_var_name(name) {
        return Err(format!(
            "invalid variable name '{}': use letters, digits and '_'",
            name
        ));
    }
    Ok((name.to_string(), value.to_string()))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::store::VarStore;

    #[test]
    fn test_parse_definition() {
        assert_eq!(
            parse_definition("A=1=2").unwrap(),
            ("A".to_string(), "1=2".to_string())
        );
        assert_eq!(parse_definition("EMPTY=").unwrap().1, "");
        assert!(parse_definition("NOVALUE").is_err());
        assert!(parse_definition("BAD-NAME=x").is_err());
        assert!(parse_definition("=x").is_err());
    }

    #[test]
    fn test_build_store_layers() {
        let mut cfg = Config::default();
        cfg.vars.insert("LAYER".into(), "config".into());
        cfg.vars.insert("ONLY_CONFIG".into(), "c".into());
        let args = VarArgs {
            defines: vec![("LAYER".into(), "cli".into())],
            no_env: true,
        };
        let store = args.build_store(&cfg).unwrap();
        assert_eq!(store.get("LAYER").unwrap().as_deref(), Some("cli"));
        assert_eq!(store.get("ONLY_CONFIG").unwrap().as_deref(), Some("c"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_build_store_inherits_environment() {
        std::env::set_var("SHVAR_TEST_INHERITED", "from-env");
        let store = VarArgs::default().build_store(&Config::default()).unwrap();
        assert_eq!(
            store.get("SHVAR_TEST_INHERITED").unwrap().as_deref(),
            Some("from-env")
        );

        let cfg = Config {
            inherit_env: false,
            ..Config::default()
        };
        let store = VarArgs::default().build_store(&cfg).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_expand_options_precedence() {
        let mut cfg = Config::default();
        cfg.syntax.windows = Some(true);
        assert_eq!(expand_options(Some(SyntaxChoice::Posix), &cfg), ExpandOptions::posix());
        assert_eq!(expand_options(None, &cfg), ExpandOptions::both());
        assert_eq!(
            expand_options(Some(SyntaxChoice::Windows), &Config::default()),
            ExpandOptions::windows()
        );
    }
}
