//! # mdi Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy shared by every processor and
//! utility in `mdi`. Each failure a processing run can hit maps onto one
//! `MdiError` variant, so callers (and tests) can tell a missing temp file
//! apart from a failed archiver run or an unreachable upload server.
//!
//! ## Architecture
//!
//! The error system consists of two components:
//! - `MdiError`: a `thiserror` enum naming each failure kind
//! - `Result<T>`: an alias for `anyhow::Result<T>` used for propagation
//!
//! Components raise an `MdiError` and wrap it in `anyhow::Error`, adding
//! context as the error moves up. The top-level handler in `main.rs` reports
//! the chain and exits with a non-zero status.
//!
//! ## Examples
//!
//! ```rust
//! // Raise a specific error kind
//! if deps.is_empty() {
//!     anyhow::bail!(MdiError::EmptyDependencyList);
//! }
//!
//! // Match on the kind further up
//! match result {
//!     Err(e) if e.downcast_ref::<MdiError>().is_some_and(|me| matches!(me, MdiError::Import { .. })) => {
//!         eprintln!("container tool rejected the archive");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the mdi application.
#[derive(Error, Debug)]
pub enum MdiError {
    #[error("Failed to create temporary archive in '{dir}': {source}")]
    TempFile {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archiver failed: {cmd}, Status: {status}, Output:\n{output}")]
    Archive {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Dependency list is empty; nothing to archive.")]
    EmptyDependencyList,

    #[error("Image import failed for '{image}': {cmd}, Status: {status}, Output:\n{output}")]
    Import {
        image: String,
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Filesystem error: {0}")]
    Io(String),

    #[error("'{cmd}' timed out after {after:?}")]
    Timeout {
        cmd: String,
        after: std::time::Duration,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MdiError {
    /// Returns true when `err` carries this exact variant kind (ignoring payload).
    pub fn is_kind(err: &anyhow::Error, probe: fn(&MdiError) -> bool) -> bool {
        err.chain()
            .filter_map(|cause| cause.downcast_ref::<MdiError>())
            .any(probe)
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
