//! # shvar CLI Render Integration Tests
//!
//! File: cli/tests/render.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `shvar render`: template files are expanded with
//! their extension stripped, other files are copied verbatim, hidden paths
//! are skipped, and the target can come from `render.output_dir`.
//!

mod common;
use common::*;
use predicates::prelude::*;

fn write_templates(sandbox: &Sandbox) {
    sandbox.write("src/app.conf.tmpl", "port=${PORT:-80}\nname=${NAME:=demo}\n");
    sandbox.write("src/nested/readme.md.template", "# ${NAME}\n");
    sandbox.write("src/static.txt", "${NOT_EXPANDED}\n");
    sandbox.write("src/.hidden.tmpl", "${SECRET}\n");
}

#[test]
fn test_render_directory() {
    let sandbox = Sandbox::new();
    write_templates(&sandbox);
    sandbox
        .cmd()
        .args(["render", "src", "out", "--no-env", "-D", "PORT=9000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rendered 2 template(s) and copied 1 file(s)",
        ));

    assert_eq!(sandbox.read("out/app.conf"), "port=9000\nname=demo\n");
    // `:=` in app.conf.tmpl is visible to the later nested template.
    assert_eq!(sandbox.read("out/nested/readme.md"), "# demo\n");
    assert_eq!(sandbox.read("out/static.txt"), "${NOT_EXPANDED}\n");
    assert!(!sandbox.path().join("out/.hidden.tmpl").exists());
    assert!(!sandbox.path().join("out/.hidden").exists());
}

#[test]
fn test_render_custom_extension() {
    let sandbox = Sandbox::new();
    sandbox.write("src/Makefile.in", "PREFIX=${PREFIX}\n");
    sandbox.write("src/keep.tmpl", "${PREFIX}\n");
    sandbox
        .cmd()
        .args(["render", "src", "out", "--no-env", "--ext", ".in", "-D", "PREFIX=/usr"])
        .assert()
        .success();

    assert_eq!(sandbox.read("out/Makefile"), "PREFIX=/usr\n");
    assert_eq!(sandbox.read("out/keep.tmpl"), "${PREFIX}\n");
}

#[test]
fn test_render_target_from_config() {
    let sandbox = Sandbox::new();
    sandbox.write("src/hello.txt.tmpl", "${GREETING}\n");
    sandbox.write(
        ".shvar.toml",
        "inherit_env = false\n[vars]\nGREETING = \"hello\"\n[render]\noutput_dir = \"rendered\"\n",
    );
    sandbox.cmd().args(["render", "src"]).assert().success();

    assert_eq!(sandbox.read("rendered/hello.txt"), "hello\n");
}

#[test]
fn test_render_without_target_fails() {
    let sandbox = Sandbox::new();
    sandbox.write("src/a.tmpl", "a\n");
    sandbox
        .cmd()
        .args(["render", "src"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No target directory"));
}

#[test]
fn test_render_expansion_error_names_file() {
    let sandbox = Sandbox::new();
    sandbox.write("src/bad.tmpl", "${REQUIRED:?set REQUIRED}\n");
    sandbox
        .cmd()
        .args(["render", "src", "out", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.tmpl"));
}

#[test]
fn test_render_missing_source_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["render", "nope", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}
