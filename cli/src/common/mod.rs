//! # mdi Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared plumbing the processors are built from, kept apart from the
//! command handlers (`commands::`) and the core infrastructure (`core::`).
//!
//! - **`archive`**: builds tarballs with the external archiver and reads them back.
//! - **`docker`**: imports tarballs as images with the container tool.
//! - **`fs`**: self-deleting temp archives and directory helpers.
//! - **`network`**: the HTTP upload client.
//! - **`process`**: runs external programs with captured output and timeouts.
//!
//! ```rust
//! use crate::common::{archive::tar::TarballBuilder, fs::temp::TempArchive};
//!
//! let staged = TempArchive::new_in(Path::new("."))?;
//! TarballBuilder::from_config(&config.archiver).build(staged.path(), &deps).await?;
//! ```
//!

/// Tarball creation and inspection.
pub mod archive;
/// Container tool interaction (image import).
pub mod docker;
/// Temporary archives and directory helpers.
pub mod fs;
/// HTTP upload client.
pub mod network;
/// External process execution.
pub mod process;
