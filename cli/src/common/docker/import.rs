//! # mdi Image Import (`common::docker::import`)
//!
//! File: cli/src/common/docker/import.rs
//!
//! ## Overview
//!
//! Runs `<tool> import <archive> <image>` and classifies the result. Used by
//! the image processor and by the `mdi serve` upload receiver.
//!
//! Whatever the tool prints is captured. On success it is logged at debug
//! level and handed back to the caller; on failure it becomes part of the
//! `MdiError::Import` error so the operator sees why the tool refused.
//!
use crate::common::process;
use crate::core::config::ContainerConfig;
use crate::core::error::{MdiError, Result};
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, error, info};

/// # Import Archive (`import_archive`)
///
/// Imports the tarball at `archive` as the image `image` using the configured
/// container tool.
///
/// ## Returns
///
/// The tool's combined output (typically the new image ID), trimmed.
///
/// ## Errors
///
/// - `MdiError::Import` if the tool cannot be started or exits non-zero.
/// - `MdiError::Timeout` if the configured container timeout elapses.
pub async fn import_archive(
    config: &ContainerConfig,
    archive: &Path,
    image: &str,
) -> Result<String> {
    info!("Importing {} as image '{}'", archive.display(), image);
    // `<tool> import <archive> <image>`, as understood by docker and podman.
    let args: [OsString; 3] = ["import".into(), archive.into(), image.into()];

    let output = match process::run_captured(&config.program, &args, config.timeout()).await {
        Ok(output) => output,
        Err(e) if MdiError::is_kind(&e, |k| matches!(k, MdiError::Timeout { .. })) => {
            error!("Container tool timed out importing '{}'", image);
            return Err(e);
        }
        // Anything else means the tool never ran (not installed, not executable).
        Err(e) => {
            error!("Failed to start container tool '{}': {:#}", config.program, e);
            anyhow::bail!(MdiError::Import {
                image: image.to_string(),
                cmd: process::display_command(&config.program, &args),
                status: "not started".to_string(),
                output: format!("{:#}", e),
            });
        }
    };

    // The tool's output is the image ID on success and the reason on failure.
    let combined = output.combined();
    if !combined.is_empty() {
        debug!("{} returns:\n{}", config.program, combined);
    }

    if !output.status.success() {
        error!(
            "Fail to load the tarball into '{}': {}",
            config.program, output.status
        );
        anyhow::bail!(MdiError::Import {
            image: image.to_string(),
            status: output.status.to_string(),
            output: combined,
            cmd: output.cmd,
        });
    }

    Ok(combined)
}
