//! # Image Processor (`processor::image`)
//!
//! File: cli/src/processor/image.rs
//!
//! ## Overview
//!
//! Packages the dependencies as a container image:
//!
//! 1. stage a tarball in a uniquely named temp file in the working directory,
//! 2. run `<tool> import <tarball> <image>`,
//! 3. log what the tool printed,
//! 4. delete the staged tarball, whether or not the import worked.
//!
//! The import is the last step, so a failure never leaves a half-built image
//! behind that would need rolling back.
//!
use super::make_temp_tarball;
use crate::common::archive::tar::TarballBuilder;
use crate::common::docker::import;
use crate::core::config::{ArchiverConfig, ContainerConfig};
use crate::core::dependency::DependencyList;
use crate::core::error::Result;
use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ImagePackager {
    image: String,
    work_dir: PathBuf,
    builder: TarballBuilder,
    container: ContainerConfig,
}

impl ImagePackager {
    pub fn new(
        image: impl Into<String>,
        archiver: &ArchiverConfig,
        container: &ContainerConfig,
    ) -> Self {
        Self {
            image: image.into(),
            work_dir: PathBuf::from("."),
            builder: TarballBuilder::from_config(archiver),
            container: container.clone(),
        }
    }

    /// Stages temporary archives in `dir` instead of the current directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub async fn process(&self, deps: &DependencyList) -> Result<()> {
        // Build the tarball in a temp file; the guard removes it on every return path.
        let staged = make_temp_tarball(&self.builder, &self.work_dir, deps)
            .await
            .context("Failed to stage tarball for image import")?;

        // Hand the archive to the container tool under the requested name.
        debug!("Try to load the tarball as image: {}", self.image);
        let output = import::import_archive(&self.container, staged.path(), &self.image).await?;
        info!("Imported image '{}' {}", self.image, output);

        // Remove the staged archive now so a failed removal is reported.
        staged.close()
    }
}
