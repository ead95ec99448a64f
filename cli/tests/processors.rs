//! # mdi CLI Processor Integration Tests
//!
//! File: cli/tests/processors.rs
//!
//! ## Overview
//!
//! End-to-end runs of the processing commands (`tar`, `image`, `print`,
//! `upload`) against the compiled binary. The archiver is the system `tar`;
//! the container tool is replaced with `true`/`false` through `--config`, so
//! no container runtime is needed.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn member_names(archive: &Path) -> Vec<String> {
    let mut archive = tar::Archive::new(fs::File::open(archive).unwrap());
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn write_tool_config(dir: &Path, tool: &str) {
    fs::write(
        dir.join("tool.toml"),
        format!("[container]\nprogram = \"{}\"\n", tool),
    )
    .unwrap();
}

/// `["a.txt","b.txt"]` through `tar --output out.tar`.
#[test]
fn test_tar_creates_archive_with_listed_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("b.txt"), "beta").unwrap();

    mdi_in(dir.path())
        .args(["tar", "--output", "out.tar", "a.txt", "b.txt"])
        .assert()
        .success();

    assert_eq!(member_names(&dir.path().join("out.tar")), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_tar_reads_list_file_after_positionals() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), name).unwrap();
    }
    fs::write(dir.path().join("deps.txt"), "# more\nc.txt\nb.txt\n").unwrap();

    mdi_in(dir.path())
        .args(["tar", "-o", "out.tar", "a.txt", "--list", "deps.txt", "--batch"])
        .assert()
        .success();

    assert_eq!(
        member_names(&dir.path().join("out.tar")),
        vec!["a.txt", "c.txt", "b.txt"]
    );
}

/// Paths that look like archiver options are still archived as files.
#[test]
fn test_tar_archives_option_like_file_names() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "-v", "--checkpoint=1"] {
        fs::write(dir.path().join(name), name).unwrap();
    }

    mdi_in(dir.path())
        .args(["tar", "-o", "out.tar", "--", "a.txt", "-v", "--checkpoint=1"])
        .assert()
        .success();

    assert_eq!(
        member_names(&dir.path().join("out.tar")),
        vec!["a.txt", "-v", "--checkpoint=1"]
    );
}

#[test]
fn test_tar_read_from_list_keeps_flag_like_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("-v"), "v").unwrap();
    fs::write(dir.path().join("deps.txt"), "-v\n").unwrap();

    mdi_in(dir.path())
        .args(["tar", "-o", "out.tar", "--batch", "--list", "deps.txt"])
        .assert()
        .success();

    assert_eq!(member_names(&dir.path().join("out.tar")), vec!["-v"]);
}

/// An empty list is an error for every packaging command, and nothing is left behind.
#[test]
fn test_empty_list_fails_for_packaging_commands() {
    let dir = tempdir().unwrap();
    write_tool_config(dir.path(), "true");

    mdi_in(dir.path())
        .args(["tar", "--output", "out.tar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency list is empty"));

    mdi_in(dir.path())
        .args(["--config", "tool.toml", "image", "--name", "app:deps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency list is empty"));

    mdi_in(dir.path())
        .args(["upload", "--server", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency list is empty"));

    assert_eq!(dir_entries(dir.path()), vec!["tool.toml"]);
}

#[test]
fn test_tar_missing_file_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();

    mdi_in(dir.path())
        .args(["tar", "-o", "out.tar", "a.txt", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archiver failed"));
}

/// `print` on `["x","y"]` writes `x\ny\n`.
#[test]
fn test_print_outputs_paths_in_order() {
    let dir = tempdir().unwrap();
    mdi_in(dir.path())
        .args(["print", "x", "y"])
        .assert()
        .success()
        .stdout("x\ny\n");
}

#[test]
fn test_print_reads_stdin_list() {
    let dir = tempdir().unwrap();
    mdi_in(dir.path())
        .args(["print", "--list", "-"])
        .write_stdin("a\n\n# skipped\nb\n")
        .assert()
        .success()
        .stdout("a\nb\n");
}

#[test]
fn test_image_success_leaves_no_temp_archive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    write_tool_config(dir.path(), "true");

    mdi_in(dir.path())
        .args(["--config", "tool.toml", "image", "--name", "app:deps", "a.txt"])
        .assert()
        .success();

    assert_eq!(dir_entries(dir.path()), vec!["a.txt", "tool.toml"]);
}

#[test]
fn test_image_import_failure_leaves_no_temp_archive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();

    mdi_in(dir.path())
        .args(["image", "--name", "app:deps", "--tool", "false", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Image import failed for 'app:deps'"));

    assert_eq!(dir_entries(dir.path()), vec!["a.txt"]);
}

#[test]
fn test_upload_without_server_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();

    mdi_in(dir.path())
        .args(["upload", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No upload server given"));
}

#[test]
fn test_upload_unreachable_server_leaves_no_temp_archive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();

    mdi_in(dir.path())
        .args(["upload", "--server", "http://127.0.0.1:9", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));

    assert_eq!(dir_entries(dir.path()), vec!["a.txt"]);
}
