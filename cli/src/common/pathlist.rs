//! # shvar Path-List Helpers (`common::pathlist`)
//!
//! File: cli/src/common/pathlist.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Helpers for `PATH`-style variables: a list of directories joined by a
//! platform separator (`:` on Unix, `;` on Windows). Entries are compared
//! ignoring trailing path separators, and without regard to ASCII case on
//! Windows, where the filesystem is case-insensitive.
//!
//! The store-backed operations (`entries`, `add`, `remove`) read and write
//! the variable through a `VarStore`, so they work the same against the
//! in-memory table and the live process environment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut vars = MemoryStore::new();
//! vars.set("PATH", "/usr/bin:/bin")?;
//! pathlist::add(&mut vars, "PATH", "/opt/tool/bin", Position::Prepend, Platform::Unix)?;
//! assert_eq!(vars.get("PATH")?.as_deref(), Some("/opt/tool/bin:/usr/bin:/bin"));
//! ```
//!
use crate::common::platform::Platform;
use crate::common::store::{StoreError, StoreResult, VarStore};
use tracing::debug;

/// Where `add` places a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Prepend,
    Append,
}

pub fn separator(platform: Platform) -> char {
    if platform.is_windows() {
        ';'
    } else {
        ':'
    }
}

/// Splits a path-list value into entries, dropping empty segments.
pub fn split(value: &str, platform: Platform) -> Vec<String> {
    value
        .split(separator(platform))
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join<S: AsRef<str>>(entries: &[S], platform: Platform) -> String {
    let sep = separator(platform).to_string();
    entries
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(&sep)
}

fn normalize(entry: &str, platform: Platform) -> String {
    let trimmed = if platform.is_windows() {
        entry.trim_end_matches(['/', '\\'])
    } else {
        entry.trim_end_matches('/')
    };
    // Keep a lone root ("/" or "\") distinguishable from an empty entry.
    let trimmed = if trimmed.is_empty() { entry } else { trimmed };
    if platform.is_windows() {
        trimmed.to_ascii_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Whether two entries name the same directory under `platform` rules.
pub fn same_entry(a: &str, b: &str, platform: Platform) -> bool {
    normalize(a, platform) == normalize(b, platform)
}

pub fn contains<S: AsRef<str>>(entries: &[S], entry: &str, platform: Platform) -> bool {
    entries
        .iter()
        .any(|existing| same_entry(existing.as_ref(), entry, platform))
}

/// Current entries of `var`; an unset variable has none.
pub fn entries(store: &dyn VarStore, var: &str, platform: Platform) -> StoreResult<Vec<String>> {
    Ok(store
        .get(var)?
        .map(|value| split(&value, platform))
        .unwrap_or_default())
}

/// Inserts `entry` into `var` exactly once, moving it if already present.
/// Returns the new value.
///
/// An empty entry (which shells read as the current directory) or one that
/// contains the separator is rejected with `StoreError::InvalidValue`.
pub fn add(
    store: &mut dyn VarStore,
    var: &str,
    entry: &str,
    position: Position,
    platform: Platform,
) -> StoreResult<String> {
    let reason = if entry.is_empty() {
        Some("path entry is empty")
    } else if entry.contains(separator(platform)) {
        Some("path entry contains the list separator")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(StoreError::InvalidValue {
            name: var.to_string(),
            reason,
        });
    }
    let mut list: Vec<String> = entries(store, var, platform)?
        .into_iter()
        .filter(|existing| !same_entry(existing, entry, platform))
        .collect();
    match position {
        Position::Prepend => list.insert(0, entry.to_string()),
        Position::Append => list.push(entry.to_string()),
    }
    let value = join(&list, platform);
    debug!("{:?} '{}' to {} ({} entries)", position, entry, var, list.len());
    store.set(var, &value)?;
    Ok(value)
}

/// Removes every occurrence of `entry` from `var`. The variable is deleted
/// when no entries remain. Returns whether anything was removed.
pub fn remove(
    store: &mut dyn VarStore,
    var: &str,
    entry: &str,
    platform: Platform,
) -> StoreResult<bool> {
    let before = entries(store, var, platform)?;
    let after: Vec<&String> = before
        .iter()
        .filter(|existing| !same_entry(existing, entry, platform))
        .collect();
    if after.len() == before.len() {
        debug!("'{}' not present in {}", entry, var);
        return Ok(false);
    }
    if after.is_empty() {
        store.delete(var)?;
    } else {
        store.set(var, &join(&after, platform))?;
    }
    Ok(true)
}
