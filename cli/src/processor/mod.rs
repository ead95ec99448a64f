//! # mdi Dependency Processors (`processor`)
//!
//! File: cli/src/processor/mod.rs
//!
//! ## Overview
//!
//! A processor consumes a `DependencyList` and produces one side effect. The
//! available strategies are a closed set, so they are modelled as variants of
//! the `Processor` enum and chosen by the command handler from the parsed
//! command line and configuration:
//!
//! | Variant   | Side effect                                               |
//! |-----------|-----------------------------------------------------------|
//! | `Tarball` | writes a tarball to the configured output path            |
//! | `Image`   | imports a temporary tarball as a named container image    |
//! | `Print`   | prints every dependency path, one per line                |
//! | `Upload`  | posts a temporary tarball to `<server>/create_tar`        |
//!
//! ## Architecture
//!
//! Every variant exposes the same operation, `process(&DependencyList)`,
//! returning `Ok(())` or the first error hit. Steps inside a processor run
//! one after another. Variants only hold configuration, so a processor can
//! be reused for several lists.
//!
//! `Image` and `Upload` stage their archive through `make_temp_tarball`,
//! which hands back a `TempArchive` guard. The guard deletes the file when it
//! goes out of scope, so the staging archive is gone when `process` returns,
//! on success and on every error path.
//!
//! ## Usage
//!
//! ```rust
//! let processor = Processor::Tarball(TarballProcessor::new("out.tar", &config.archiver));
//! processor.process(&deps).await?;
//! ```
//!
use crate::common::archive::tar::TarballBuilder;
use crate::common::fs::temp::TempArchive;
use crate::core::dependency::DependencyList;
use crate::core::error::Result;
use std::path::Path;
use tracing::{debug, info};

pub mod image;
pub mod print;
pub mod tarball;
pub mod upload;

pub use image::ImagePackager;
pub use print::Printer;
pub use tarball::TarballProcessor;
pub use upload::RemoteUploader;

/// The processing strategies, selected by configuration.
#[derive(Debug)]
pub enum Processor {
    Tarball(TarballProcessor),
    Image(ImagePackager),
    Print(Printer),
    Upload(RemoteUploader),
}

impl Processor {
    /// Runs the selected strategy over `deps`.
    pub async fn process(&self, deps: &DependencyList) -> Result<()> {
        info!(
            "Processing {} dependency file(s) with the {} processor",
            deps.len(),
            self.name()
        );
        match self {
            Processor::Tarball(p) => p.process(deps).await,
            Processor::Image(p) => p.process(deps).await,
            Processor::Print(p) => p.process(deps),
            Processor::Upload(p) => p.process(deps).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Processor::Tarball(_) => "tarball",
            Processor::Image(_) => "image",
            Processor::Print(_) => "print",
            Processor::Upload(_) => "upload",
        }
    }
}

/// Builds a tarball of `deps` in a fresh temp file inside `work_dir`.
///
/// The returned guard owns the file. If building fails the guard is dropped
/// here and the file removed before the error propagates.
pub(crate) async fn make_temp_tarball(
    builder: &TarballBuilder,
    work_dir: &Path,
    deps: &DependencyList,
) -> Result<TempArchive> {
    let temp = TempArchive::new_in(work_dir)?;
    debug!("Staging tarball at {}", temp.path().display());
    builder.build(temp.path(), deps).await?;
    Ok(temp)
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::config::ArchiverConfig;
    use crate::core::error::MdiError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_make_temp_tarball_cleans_up_on_build_failure() -> Result<()> {
        let dir = tempdir()?;
        let builder = TarballBuilder::from_config(&ArchiverConfig::default());

        let err = make_temp_tarball(&builder, dir.path(), &DependencyList::new())
            .await
            .unwrap_err();

        assert!(MdiError::is_kind(&err, |e| matches!(e, MdiError::EmptyDependencyList)));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_make_temp_tarball_keeps_file_while_guard_lives() -> Result<()> {
        let dir = tempdir()?;
        let dep = dir.path().join("lib.so");
        std::fs::write(&dep, "elf")?;
        let deps: DependencyList = [dep.to_string_lossy().into_owned()].into_iter().collect();
        let builder = TarballBuilder::from_config(&ArchiverConfig::default());

        let temp = make_temp_tarball(&builder, dir.path(), &deps).await?;
        assert!(temp.path().metadata()?.len() > 0);
        let staged = temp.path().to_path_buf();
        drop(temp);
        assert!(!staged.exists());
        Ok(())
    }

    #[test]
    fn test_processor_names() {
        assert_eq!(Processor::Print(Printer).name(), "print");
    }
}
