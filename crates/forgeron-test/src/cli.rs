//! CLI regression tests for the `forgeron` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in
//! flag names, exit codes, and startup errors — things the Rust API tests
//! can't catch. Only non-serving invocations are exercised here; the
//! serving paths live in `service.rs`.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

/// Returns an assert_cmd Command wrapping the `forgeron` binary.
fn forgeron() -> Command {
    // cargo_bin is deprecated for custom build-dir setups; fine for standard workspace use.
    #[allow(deprecated)]
    let cmd = Command::cargo_bin("forgeron")
        .expect("forgeron binary not found — run `cargo build -p forgeron` first");
    cmd
}

#[test]
fn missing_build_file_is_a_startup_error() {
    forgeron()
        .arg("/no/such/Makefile")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("build file not found"));
}

#[test]
fn directory_as_build_file_is_a_startup_error() {
    let tmp = TempDir::new().expect("temp dir");
    forgeron()
        .arg(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not a regular file"));
}

#[test]
fn no_arguments_is_a_usage_error() {
    // clap returns exit code 2 for missing required args
    forgeron().assert().failure().code(2);
}

#[test]
fn help_lists_the_flags() {
    forgeron()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--port"))
        .stdout(contains("--output"))
        .stdout(contains("--build-timeout"));
}
