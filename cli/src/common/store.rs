//! # shvar Variable Stores (`common::store`)
//!
//! File: cli/src/common/store.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module provides the key/value tables that back variable expansion.
//! The expansion engine never touches a table directly: it sees a `Scope`,
//! and `StoreScope` adapts any `VarStore` into one.
//!
//! ## Architecture
//!
//! - **`VarStore`**: The `get` / `set` / `delete` / `has` / `keys` contract.
//! - **`MemoryStore`**: An ordered in-memory table. The CLI snapshots the
//!   process environment into one, layers configuration and `-D` definitions
//!   on top, and expands against it.
//! - **`EnvStore`**: A thin adapter over the process environment (`std::env`).
//!   Names containing `=` or NUL and values containing NUL are rejected
//!   instead of being handed to the OS; `keys` leaves out names it could not
//!   read back (non-Unicode, or Windows' hidden `=C:` entries).
//! - **`StoreScope`**: Exposes a `VarStore` as an expansion `Scope` and
//!   records every assignment made through it, so `shvar expand --export`
//!   can report the defaults a template persisted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::store::{EnvStore, MemoryStore, StoreScope, VarStore};
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let mut vars = MemoryStore::from_store(&EnvStore)?;
//! vars.set("GREETING", "hello")?;
//! let mut scope = StoreScope::new(&mut vars);
//! let text = expand::expand("${GREETING}, ${USER:-friend}", &mut scope, &ExpandOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::ShvarError;
use crate::core::expand::Scope;
use std::collections::BTreeMap;
use std::env;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Failures raised by a variable store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid variable name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: &'static str },

    #[error("value of '{name}' is not valid Unicode")]
    NotUnicode { name: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A key/value table of variables.
pub trait VarStore {
    fn get(&self, name: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, name: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing variable is not an error.
    fn delete(&mut self, name: &str) -> StoreResult<()>;

    fn has(&self, name: &str) -> StoreResult<bool> {
        Ok(self.get(name)?.is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// In-memory variable table, iterated in name order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    vars: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every variable of `source` into a new table. Variables whose
    /// value is not valid Unicode are skipped.
    pub fn from_store(source: &dyn VarStore) -> StoreResult<Self> {
        let mut store = Self::new();
        for name in source.keys()? {
            match source.get(&name) {
                Ok(Some(value)) => {
                    store.vars.insert(name, value);
                }
                Ok(None) => {}
                Err(StoreError::NotUnicode { name }) => {
                    warn!("Skipping '{}': value is not valid Unicode", name);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("Snapshotted {} variables", store.vars.len());
        Ok(store)
    }

    /// Sets each pair, later pairs overriding earlier ones.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VarStore for MemoryStore {
    fn get(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.vars.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> StoreResult<()> {
        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        self.vars.remove(name);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.vars.keys().cloned().collect())
    }
}

/// The process environment as a `VarStore`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvStore;

impl EnvStore {
    fn check_name(name: &str) -> StoreResult<()> {
        let reason = if name.is_empty() {
            "name is empty"
        } else if name.contains('=') {
            "name contains '='"
        } else if name.contains('\0') {
            "name contains a NUL byte"
        } else {
            return Ok(());
        };
        Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        })
    }
}

impl VarStore for EnvStore {
    fn get(&self, name: &str) -> StoreResult<Option<String>> {
        Self::check_name(name)?;
        match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(StoreError::NotUnicode {
                name: name.to_string(),
            }),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> StoreResult<()> {
        Self::check_name(name)?;
        if value.contains('\0') {
            return Err(StoreError::InvalidValue {
                name: name.to_string(),
                reason: "value contains a NUL byte",
            });
        }
        env::set_var(name, value);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        Self::check_name(name)?;
        env::remove_var(name);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = env::vars_os()
            .filter_map(|(name, _)| name.into_string().ok())
            .filter(|name| Self::check_name(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Exposes a `VarStore` to the expansion engine.
pub struct StoreScope<'s, S: VarStore + ?Sized> {
    store: &'s mut S,
    assigned: Vec<(String, String)>,
}

impl<'s, S: VarStore + ?Sized> StoreScope<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            assigned: Vec::new(),
        }
    }

    /// Assignments made by `=` / `:=` references, in the order they happened.
    pub fn assignments(&self) -> &[(String, String)] {
        &self.assigned
    }
}

impl<S: VarStore + ?Sized> Scope for StoreScope<'_, S> {
    type Error = ShvarError;

    fn lookup(&mut self, name: &str) -> Result<Option<String>, ShvarError> {
        Ok(self.store.get(name)?)
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), ShvarError> {
        trace!("Storing '{}' = {:?}", name, value);
        self.store.set(name, value)?;
        self.assigned.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ExpansionErrorKind;
    use crate::core::expand::{self, ExpandOptions};

    #[test]
    fn test_memory_store_operations() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("B", "2").unwrap();
        store.set("A", "1").unwrap();
        assert_eq!(store.get("A").unwrap(), Some("1".to_string()));
        assert!(store.has("B").unwrap());
        assert!(!store.has("C").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["A", "B"]);

        store.delete("A").unwrap();
        store.delete("A").unwrap();
        assert_eq!(store.get("A").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_extend_and_snapshot() {
        let mut source = MemoryStore::new();
        source.extend([("X", "1"), ("Y", "2"), ("X", "3")]);
        let copy = MemoryStore::from_store(&source).unwrap();
        assert_eq!(copy, source);
        assert_eq!(copy.iter().collect::<Vec<_>>(), vec![("X", "3"), ("Y", "2")]);
    }

    #[test]
    fn test_env_store_round_trip() {
        let mut store = EnvStore;
        let name = "SHVAR_TEST_ENV_STORE_ROUND_TRIP";
        store.set(name, "value").unwrap();
        assert_eq!(store.get(name).unwrap(), Some("value".to_string()));
        assert!(store.keys().unwrap().iter().any(|k| k == name));
        store.delete(name).unwrap();
        assert!(!store.has(name).unwrap());
    }

    #[test]
    fn test_env_store_rejects_bad_names_and_values() {
        let mut store = EnvStore;
        assert!(matches!(
            store.set("", "x"),
            Err(StoreError::InvalidName { .. })
        ));
        assert!(matches!(
            store.set("A=B", "x"),
            Err(StoreError::InvalidName { .. })
        ));
        assert!(matches!(
            store.get("NUL\0NAME"),
            Err(StoreError::InvalidName { .. })
        ));
        assert!(matches!(
            store.set("SHVAR_TEST_NUL_VALUE", "a\0b"),
            Err(StoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_store_scope_records_assignments() {
        let mut store = MemoryStore::new();
        store.set("SET", "v").unwrap();
        let mut scope = StoreScope::new(&mut store);
        let text = expand::expand(
            "${SET:=x} ${A:=1} ${B:=${A}2}",
            &mut scope,
            &ExpandOptions::posix(),
        )
        .unwrap();
        assert_eq!(text, "v 1 12");
        assert_eq!(
            scope.assignments(),
            &[
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "12".to_string())
            ]
        );
        assert_eq!(store.get("B").unwrap(), Some("12".to_string()));
    }

    #[test]
    fn test_store_scope_surfaces_store_errors() {
        let mut store = EnvStore;
        let mut scope = StoreScope::new(&mut store);
        let err = expand::expand("${SHVAR_TEST_NUL_ASSIGN:=a\0b}", &mut scope, &ExpandOptions::posix()).unwrap_err();
        assert!(matches!(
            err,
            ShvarError::Store {
                source: StoreError::InvalidValue { .. }
            }
        ));

        let err = expand::expand("${X", &mut scope, &ExpandOptions::posix()).unwrap_err();
        match err {
            ShvarError::Expansion { source } => {
                assert_eq!(source.kind, ExpansionErrorKind::UnterminatedReference)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
