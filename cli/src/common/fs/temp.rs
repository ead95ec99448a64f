//! # mdi Temporary Archives (`common::fs::temp`)
//!
//! File: cli/src/common/fs/temp.rs
//!
//! ## Overview
//!
//! The image and upload processors (and `mdi serve`) stage their tarball in a
//! temporary file that must be gone by the time they return, whatever the
//! outcome. `TempArchive` owns such a file:
//!
//! - it is created with a unique name (prefix `mdi`) in a given directory,
//!   never colliding with an existing file;
//! - it is deleted when the guard is dropped (through `tempfile::TempPath`),
//!   on every exit path, including early returns through `?`;
//! - `close` deletes it eagerly and reports a failed removal.
//!
//! The file is created empty and closed straight away, since the external
//! archiver writes it by path.
//!
use crate::core::error::{MdiError, Result};
use std::path::Path;
use tempfile::TempPath;
use tracing::debug;

const TEMP_PREFIX: &str = "mdi";
const TEMP_SUFFIX: &str = ".tar";

/// A uniquely named file that is removed when dropped.
#[derive(Debug)]
pub struct TempArchive {
    path: TempPath,
}

impl TempArchive {
    /// Creates an empty, uniquely named file inside `dir`.
    ///
    /// # Errors
    ///
    /// `MdiError::TempFile` if the file cannot be created (missing directory,
    /// permissions, ...).
    pub fn new_in(dir: &Path) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
            .map_err(|source| MdiError::TempFile {
                dir: dir.display().to_string(),
                source,
            })?;
        // Close the handle but keep the path guard: the archiver (or the
        // server) reopens the file by name.
        let path = file.into_temp_path();
        debug!("Created temporary archive {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file now, returning any removal error instead of logging it.
    pub fn close(self) -> Result<()> {
        // Keep a printable copy; `close` consumes the path.
        let shown = self.path.display().to_string();
        self.path.close().map_err(|e| {
            MdiError::Io(format!(
                "Failed to remove temporary archive {}: {}",
                shown, e
            ))
        })?;
        debug!("Removed temporary archive {}", shown);
        Ok(())
    }
}
