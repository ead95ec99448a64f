//! # Upload Processor (`processor::upload`)
//!
//! File: cli/src/processor/upload.rs
//!
//! ## Overview
//!
//! Ships the dependencies to a remote `mdi serve` (or any compatible
//! endpoint):
//!
//! 1. stage a tarball in a uniquely named temp file in the working directory,
//! 2. `POST` its bytes to `<server>/create_tar`,
//! 3. print the response body if there is one,
//! 4. delete the staged tarball, whatever happened.
//!
//! The request always goes to the configured server; the staged file only
//! supplies the body.
//!
use super::make_temp_tarball;
use crate::common::archive::tar::TarballBuilder;
use crate::common::network::http;
use crate::core::config::{self, ArchiverConfig, UploadConfig};
use crate::core::dependency::DependencyList;
use crate::core::error::{MdiError, Result};
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RemoteUploader {
    server: String,
    work_dir: PathBuf,
    builder: TarballBuilder,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl RemoteUploader {
    /// Creates an uploader for `server` (`http://` or `https://` base URL).
    pub fn new(
        server: impl Into<String>,
        archiver: &ArchiverConfig,
        upload: &UploadConfig,
    ) -> Result<Self> {
        let server = server.into();
        config::validate_server_url(&server)?;
        Ok(Self {
            server,
            work_dir: PathBuf::from("."),
            builder: TarballBuilder::from_config(archiver),
            client: http::build_client(upload.timeout())?,
            timeout: upload.timeout(),
        })
    }

    /// Stages temporary archives in `dir` instead of the current directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> String {
        http::upload_url(&self.server)
    }

    pub async fn process(&self, deps: &DependencyList) -> Result<()> {
        // Stage the tarball in a temp file owned by this call.
        let staged = make_temp_tarball(&self.builder, &self.work_dir, deps)
            .await
            .context("Failed to stage tarball for upload")?;

        // POST it to the configured server; on error the guard still cleans up.
        let response = http::post_archive(&self.client, &self.server, staged.path(), self.timeout)
            .await
            .with_context(|| format!("Failed to upload archive to {}", self.endpoint()))?;

        // Echo whatever the server answered (usually the imported image ID).
        if !response.is_empty() {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{}", response)
                .map_err(|e| MdiError::Io(format!("Failed to print server response: {}", e)))?;
        }

        staged.close()
    }
}
