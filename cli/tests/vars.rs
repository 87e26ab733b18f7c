//! # shvar CLI Vars Integration Tests
//!
//! File: cli/tests/vars.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `shvar vars`, which prints the merged variable table.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_vars_sorted_definitions() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["vars", "--no-env", "-D", "ZED=last", "-D", "ALPHA=first"])
        .assert()
        .success()
        .stdout("ALPHA=first\nZED=last\n");
}

#[test]
fn test_vars_layering() {
    let sandbox = Sandbox::new();
    sandbox.write(".shvar.toml", "[vars]\nLAYER = \"config\"\nSHVAR_IT_LAYERED = \"config\"\n");
    sandbox
        .cmd()
        .env("SHVAR_IT_LAYERED", "env")
        .env("SHVAR_IT_ONLY_ENV", "env")
        .args(["vars", "-D", "LAYER=cli"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LAYER=cli\n"))
        .stdout(predicate::str::contains("SHVAR_IT_LAYERED=config\n"))
        .stdout(predicate::str::contains("SHVAR_IT_ONLY_ENV=env\n"));
}

#[test]
fn test_vars_empty_table() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["vars", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
