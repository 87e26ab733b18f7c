//! # shvar Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for shvar, handling loading,
//! merging, validation, and access to configuration data. It combines defaults,
//! user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.shvar.toml` in current directory or ancestors (up to the first `.git`)
//! 2. User-specific `~/.config/shvar/config.toml` (platform equivalent via `directories`)
//! 3. Default values defined in the code
//!
//! Settings:
//! - `inherit_env`: seed the variable table from the process environment.
//! - `[syntax]`: which reference syntaxes are recognised. Unset fields fall back
//!   to the platform default (POSIX always, `%VAR%` on Windows).
//! - `[vars]`: variables layered over the environment before expansion.
//! - `[render]`: template extensions and default output directory for `shvar render`.
//!
//! ## Examples
//!
//! ```toml
//! inherit_env = true
//!
//! [syntax]
//! windows = true
//!
//! [vars]
//! PROJECT = "shvar"
//!
//! [render]
//! extensions = [".tmpl"]
//! output_dir = "~/rendered"
//! ```
//!
use crate::common::platform::Platform;
use crate::core::error::{Result, ShvarError};
use crate::core::expand::ExpandOptions;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// The resolved configuration every command works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Start from a snapshot of the process environment.
    pub inherit_env: bool,
    pub syntax: SyntaxConfig,
    /// Extra variables, applied over the environment.
    pub vars: BTreeMap<String, String>,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inherit_env: default_inherit_env(),
            syntax: SyntaxConfig::default(),
            vars: BTreeMap::new(),
            render: RenderConfig::default(),
        }
    }
}

/// Which reference syntaxes to recognise. `None` means "platform default".
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SyntaxConfig {
    pub posix: Option<bool>,
    pub windows: Option<bool>,
}

impl SyntaxConfig {
    pub fn to_options(self, platform: Platform) -> ExpandOptions {
        let defaults = ExpandOptions::for_platform(platform);
        ExpandOptions {
            posix: self.posix.unwrap_or(defaults.posix),
            windows: self.windows.unwrap_or(defaults.windows),
        }
    }

    /// Settings from `over` win; unset ones fall back to `self`.
    fn overridden_by(self, over: SyntaxConfig) -> SyntaxConfig {
        SyntaxConfig {
            posix: over.posix.or(self.posix),
            windows: over.windows.or(self.windows),
        }
    }
}

/// Settings for `shvar render`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// File suffixes treated as templates; stripped from the rendered file name.
    pub extensions: Vec<String>,
    /// Used when `shvar render` is given no target directory (can use ~). Will be expanded.
    pub output_dir: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extensions: default_template_extensions(),
            output_dir: None,
        }
    }
}

/// One configuration file as written. A field left out of the file is
/// `None`, so an explicit value (even one equal to the default) still
/// overrides the other file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    inherit_env: Option<bool>,
    #[serde(default)]
    syntax: SyntaxConfig,
    #[serde(default)]
    vars: BTreeMap<String, String>,
    #[serde(default)]
    render: RenderFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct RenderFile {
    extensions: Option<Vec<String>>,
    output_dir: Option<String>,
}

fn default_inherit_env() -> bool {
    true
}
fn default_template_extensions() -> Vec<String> {
    vec![".tmpl".to_string(), ".template".to_string()]
}

const PROJECT_CONFIG_FILENAME: &str = ".shvar.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config, Platform::current())
        .context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "Shvar", "shvar") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.exists() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.shvar.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Every setting the project file states wins over the user file, and
/// anything neither file states takes its default. `[vars]` tables are
/// merged key by key.
fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> Config {
    let project = project.unwrap_or_default();
    let mut vars = user.vars;
    vars.extend(project.vars);
    Config {
        inherit_env: project
            .inherit_env
            .or(user.inherit_env)
            .unwrap_or_else(default_inherit_env),
        syntax: user.syntax.overridden_by(project.syntax),
        vars,
        render: RenderConfig {
            extensions: project
                .render
                .extensions
                .or(user.render.extensions)
                .unwrap_or_else(default_template_extensions),
            output_dir: project.render.output_dir.or(user.render.output_dir),
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.render.output_dir.as_mut() {
        let expanded = shellexpand::tilde(dir.as_str()).into_owned();
        *dir = expanded;
        debug!("Expanded render output directory: {}", dir);
    }
    Ok(())
}

/// Same alphabet the expander accepts in a reference name.
pub fn is_valid_var_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b == b'_' || b.is_ascii_alphanumeric())
}

fn validate_config(config: &Config, platform: Platform) -> Result<()> {
    info!("Validating final configuration...");
    let options = config.syntax.to_options(platform);
    if !options.posix && !options.windows {
        return Err(anyhow!(ShvarError::Config(
            "No reference syntax is enabled on this platform; set [syntax] posix or windows to true."
                .to_string()
        )));
    }
    for name in config.vars.keys() {
        if !is_valid_var_name(name) {
            return Err(anyhow!(ShvarError::Config(format!(
                "Invalid variable name in [vars]: '{}'. Names may only contain letters, digits and '_'.",
                name
            ))));
        }
    }
    for ext in &config.render.extensions {
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(anyhow!(ShvarError::Config(format!(
                "Invalid template extension: '{}'. Expected a suffix such as '.tmpl'.",
                ext
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
