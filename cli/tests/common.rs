//! # mdi CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! is compiled as its own crate and includes this module with `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get mdi Command (`mdi_cmd`)
///
/// Returns an `assert_cmd::Command` for the compiled `mdi` binary.
///
/// ## Panics
/// Panics if the `mdi` binary cannot be found via `Command::cargo_bin`.
pub fn mdi_cmd() -> Command {
    Command::cargo_bin("mdi").expect("Failed to find mdi binary for testing")
}

/// An `mdi` command running inside `dir`, isolated from the user's own
/// configuration and upload server settings.
pub fn mdi_in(dir: &Path) -> Command {
    let mut cmd = mdi_cmd();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env_remove("MDI_SERVER")
        .env_remove("RUST_LOG");
    cmd
}

/// Names of the entries directly inside `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read test dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
