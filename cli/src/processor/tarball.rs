//! # Tarball Processor (`processor::tarball`)
//!
//! File: cli/src/processor/tarball.rs
//!
//! Writes the dependencies into a tarball at a fixed output path. Unlike the
//! other packaging processors the archive is the product, so it is kept.
//!
use crate::common::archive::tar::TarballBuilder;
use crate::core::config::ArchiverConfig;
use crate::core::dependency::DependencyList;
use crate::core::error::Result;
use anyhow::Context;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TarballProcessor {
    output: PathBuf,
    builder: TarballBuilder,
}

impl TarballProcessor {
    pub fn new(output: impl Into<PathBuf>, archiver: &ArchiverConfig) -> Self {
        Self {
            output: output.into(),
            builder: TarballBuilder::from_config(archiver),
        }
    }

    /// Creates (or overwrites) the output archive with every dependency, in order.
    pub async fn process(&self, deps: &DependencyList) -> Result<()> {
        debug!("Start to create tarball {}", self.output.display());
        self.builder
            .build(&self.output, deps)
            .await
            .with_context(|| format!("Failed to create tarball {}", self.output.display()))?;
        debug!("Make tarball is finished");
        Ok(())
    }
}
