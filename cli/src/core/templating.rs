//! # shvar Template Directory Rendering
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module renders a whole directory of templates. Every file whose name
//! ends with a template extension is run through the expansion engine and
//! written with the extension stripped; every other file is copied as is.
//!
//! ## Architecture
//!
//! 1. Recursively scan the source directory
//! 2. For each file:
//!    - If it's a template file (by extension, case-insensitive), expand it
//!    - Otherwise, copy it directly
//! 3. Create the target directory structure mirroring the source
//!
//! Features:
//! - Skips hidden files and directories (starting with `.`)
//! - One scope is shared by all files, so a `${NAME:=default}` in one file
//!   is visible to the files rendered after it (walk order is sorted by name)
//! - Expansion errors name the offending file
//!
//! ## Examples
//!
//! ```rust,ignore
//! let mut scope = StoreScope::new(&mut vars);
//! let rendered = templating::render_template_directory(
//!     &source_path,
//!     &target_path,
//!     &mut scope,
//!     &ExpandOptions::default(),
//!     &[".tmpl", ".template"],
//! )?;
//! ```
//!
use crate::core::error::{Result, ShvarError};
use crate::core::expand::{self, ExpandOptions, Scope};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What a render pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub copied: usize,
}

/// Returns the matching extension if `file_name` ends with one of `extensions`.
fn template_extension<'e>(file_name: &str, extensions: &[&'e str]) -> Option<&'e str> {
    extensions.iter().copied().find(|ext| {
        let Some(stem_len) = file_name.len().checked_sub(ext.len()) else {
            return false;
        };
        stem_len > 0
            && file_name.is_char_boundary(stem_len)
            && file_name[stem_len..].eq_ignore_ascii_case(ext)
    })
}

pub fn render_template_directory<S>(
    source_dir: &Path,
    target_dir: &Path,
    scope: &mut S,
    options: &ExpandOptions,
    template_extensions: &[&str],
) -> Result<RenderSummary>
where
    S: Scope<Error = ShvarError> + ?Sized,
{
    info!(
        "Starting template processing from '{}' to '{}'",
        source_dir.display(),
        target_dir.display()
    );
    if !source_dir.is_dir() {
        anyhow::bail!(ShvarError::FileSystem(format!(
            "Template source '{}' is not a directory",
            source_dir.display()
        )));
    }
    fs::create_dir_all(target_dir).with_context(|| {
        format!(
            "Failed to create target directory '{}'",
            target_dir.display()
        )
    })?;

    let mut summary = RenderSummary::default();
    for entry_result in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    "Failed to access entry during walk in '{}': {}",
                    source_dir.display(),
                    e
                );
                continue;
            }
        };
        let src_path = entry.path();
        let Ok(relative_path) = src_path.strip_prefix(source_dir) else {
            warn!(
                "Could not determine relative path for '{}' based on '{}'",
                src_path.display(),
                source_dir.display()
            );
            continue;
        };
        let target_path = target_dir.join(relative_path);

        if relative_path
            .components()
            .any(|comp| comp.as_os_str().to_string_lossy().starts_with('.'))
        {
            debug!("Skipping hidden path: {}", src_path.display());
            continue;
        }

        if src_path.is_dir() {
            fs::create_dir_all(&target_path).with_context(|| {
                format!(
                    "Failed to create target subdirectory '{}'",
                    target_path.display()
                )
            })?;
            debug!("Created directory: {}", target_path.display());
        } else if src_path.is_file() {
            let file_name = entry.file_name().to_string_lossy();
            if let Some(ext) = template_extension(&file_name, template_extensions) {
                debug!("Rendering template file: {}", src_path.display());
                let template_content = fs::read_to_string(src_path).with_context(|| {
                    format!("Failed to read template file '{}'", src_path.display())
                })?;
                let rendered_content = expand::expand(&template_content, scope, options)
                    .with_context(|| {
                        format!("Expansion failed for template file '{}'", src_path.display())
                    })?;
                let final_target_path =
                    target_path.with_file_name(&file_name[..file_name.len() - ext.len()]);
                fs::write(&final_target_path, rendered_content).with_context(|| {
                    format!(
                        "Failed to write rendered file '{}'",
                        final_target_path.display()
                    )
                })?;
                info!(
                    "Rendered template '{}' to '{}'",
                    src_path.display(),
                    final_target_path.display()
                );
                summary.rendered += 1;
            } else {
                fs::copy(src_path, &target_path).with_context(|| {
                    format!(
                        "Failed to copy file '{}' to '{}'",
                        src_path.display(),
                        target_path.display()
                    )
                })?;
                debug!(
                    "Copied file '{}' to '{}'",
                    src_path.display(),
                    target_path.display()
                );
                summary.copied += 1;
            }
        } else {
            warn!(
                "Skipping unsupported file system entry type at '{}'",
                src_path.display()
            );
        }
    }
    info!(
        "Template processing completed: {} rendered, {} copied.",
        summary.rendered, summary.copied
    );
    Ok(summary)
}
