//! # shvar CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/` (`expand.rs`,
//! `render.rs`, `path.rs`, `vars.rs`, `main_tests.rs`).
//!
//! Most tests run the binary inside a `Sandbox`: a temporary directory that
//! contains a `.git` marker (so the project config search stops there) and
//! that doubles as `HOME` / `XDG_CONFIG_HOME` (so no real user config leaks in).
//!

// Different test crates use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// # Get shvar Command (`shvar_cmd`)
///
/// Creates an `assert_cmd::Command` pointing to the compiled `shvar` binary.
///
/// ## Panics
/// Panics if the `shvar` binary cannot be found via `Command::cargo_bin`.
pub fn shvar_cmd() -> Command {
    Command::cargo_bin("shvar").expect("Failed to find shvar binary for testing")
}

/// An isolated working directory for one test.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create sandbox directory");
        fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
        Sandbox { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write sandbox file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("Failed to read sandbox file")
    }

    /// A `shvar` command running inside the sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = shvar_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG");
        cmd
    }
}
