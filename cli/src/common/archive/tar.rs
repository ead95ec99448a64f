//! # mdi TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module builds the tarballs every packaging processor depends on, and
//! reads them back when their contents need checking.
//!
//! ## Architecture
//!
//! - **Writing** is delegated to an external archiver (`tar` by default). The
//!   first dependency is added with `-cf` (create), every later one with `-uf`
//!   (update/append), one process per file, in list order. Each invocation's
//!   exit status is checked and the first failure aborts the build.
//! - Members always follow `--`, so paths that look like options stay paths.
//!   A path repeated in the list is added once, at its first position.
//! - With `batch` enabled, a single `-cf` invocation receives every member.
//! - An empty dependency list is rejected before anything touches the disk.
//! - **Reading** uses the `tar` crate (`list_members`), which lets `mdi serve`
//!   validate uploads and tests inspect what the archiver produced.
//!
//! ## Usage
//!
//! ```rust
//! let builder = TarballBuilder::from_config(&config.archiver);
//! builder.build(Path::new("out.tar"), &deps).await?;
//! let members = tar::list_members(Path::new("out.tar"))?;
//! ```
//!
use crate::common::process::{self, CommandOutput};
use crate::core::config::ArchiverConfig;
use crate::core::dependency::DependencyList;
use crate::core::error::{MdiError, Result};
use anyhow::Context;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Builds a tarball from a `DependencyList` with an external archiver.
#[derive(Debug, Clone)]
pub struct TarballBuilder {
    program: String,
    batch: bool,
    timeout: Option<Duration>,
}

impl TarballBuilder {
    pub fn from_config(config: &ArchiverConfig) -> Self {
        Self {
            program: config.program.clone(),
            batch: config.batch,
            timeout: config.timeout(),
        }
    }

    /// # Build Archive (`build`)
    ///
    /// Creates (or overwrites) `output` and adds every dependency to it, in order.
    ///
    /// ## Errors
    ///
    /// - `MdiError::EmptyDependencyList` if `deps` is empty (no file is created).
    /// - `MdiError::Io` if `output` cannot be created (missing directory,
    ///   permission denied, an existing directory in the way).
    /// - `MdiError::Archive` if the archiver cannot be started or exits non-zero.
    /// - `MdiError::Timeout` if an invocation exceeds the configured timeout.
    pub async fn build(&self, output: &Path, deps: &DependencyList) -> Result<()> {
        // Reject an empty list before anything touches the disk.
        if deps.is_empty() {
            anyhow::bail!(MdiError::EmptyDependencyList);
        }

        // Create (or truncate) the output ourselves: a location we cannot write
        // to is a filesystem error, not an archiver failure.
        std::fs::File::create(output).map_err(|e| {
            MdiError::Io(format!(
                "Cannot create archive '{}': {}",
                output.display(),
                e
            ))
        })?;

        // Each path goes in once, at its first position in the list.
        let mut seen = HashSet::new();
        let members: Vec<&str> = deps.iter().filter(|path| seen.insert(*path)).collect();
        if members.len() < deps.len() {
            debug!(
                "Skipping {} repeated path(s)",
                deps.len() - members.len()
            );
        }

        debug!(
            "Start to create tarball {} with {} file(s)",
            output.display(),
            members.len()
        );

        if self.batch {
            // One call: create the archive with every member at once.
            self.invoke(&archiver_args("-cf", output, &members)).await?;
        } else {
            for (index, file) in members.iter().enumerate() {
                debug!("Add file {} to tarball", file);
                // The first member creates the archive, later ones are appended.
                let mode = if index == 0 { "-cf" } else { "-uf" };
                self.invoke(&archiver_args(mode, output, &[*file])).await?;
            }
        }

        info!("Created tarball {}", output.display());
        Ok(())
    }

    async fn invoke(&self, args: &[OsString]) -> Result<CommandOutput> {
        // A timeout keeps its own kind; any other launch failure is the archiver's.
        let output = match process::run_captured(&self.program, args, self.timeout).await {
            Ok(output) => output,
            Err(e) if MdiError::is_kind(&e, |k| matches!(k, MdiError::Timeout { .. })) => {
                return Err(e);
            }
            Err(e) => {
                anyhow::bail!(MdiError::Archive {
                    cmd: process::display_command(&self.program, args),
                    status: "not started".to_string(),
                    output: format!("{:#}", e),
                });
            }
        };

        if !output.status.success() {
            anyhow::bail!(MdiError::Archive {
                status: output.status.to_string(),
                output: output.combined(),
                cmd: output.cmd,
            });
        }
        Ok(output)
    }
}

/// Argument list for one archiver call: `<mode> <output> -- <members...>`.
///
/// `--` ends option parsing, so a member named like a flag (`-v`,
/// `--checkpoint=1`) is still read as a path. An output path starting with
/// `-` is passed as `./<output>` for the same reason (`-` alone would mean
/// stdout).
fn archiver_args(mode: &str, output: &Path, members: &[&str]) -> Vec<OsString> {
    let output = if output.as_os_str().to_string_lossy().starts_with('-') {
        Path::new(".").join(output)
    } else {
        output.to_path_buf()
    };
    let mut args: Vec<OsString> = vec![mode.into(), output.into(), "--".into()];
    args.extend(members.iter().map(|member| OsString::from(*member)));
    args
}

/// Lists the member paths of the tar archive at `path`, in archive order.
pub fn list_members(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;
    let mut archive = ::tar::Archive::new(file);
    let mut members = Vec::new();
    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read archive {}", path.display()))?
    {
        let entry = entry.with_context(|| format!("Corrupt entry in {}", path.display()))?;
        let member = entry
            .path()
            .with_context(|| format!("Invalid member path in {}", path.display()))?;
        members.push(member.to_string_lossy().replace('\\', "/"));
    }
    Ok(members)
}
