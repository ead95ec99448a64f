//! # mdi Upload Client (`common::network::http`)
//!
//! File: cli/src/common/network/http.rs
//!
//! ## Overview
//!
//! Sends a tarball to a receiving server with a single
//! `POST <server>/create_tar` request whose body is the raw archive bytes
//! (`Content-Type: application/binary`), and returns the response body.
//!
//! The endpoint is always derived from the configured server URL. The local
//! path of the archive never takes part in it.
//!
//! ## Errors
//!
//! Everything that goes wrong on the wire maps to `MdiError::Network`: the
//! request cannot be sent, the body cannot be read, or the server answers
//! with a non-success status. An elapsed client timeout is reported as
//! `MdiError::Timeout`.
//!
use crate::core::error::{MdiError, Result};
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Path of the upload endpoint, relative to the server URL.
pub const UPLOAD_PATH: &str = "create_tar";
/// Content type sent with archive uploads.
pub const UPLOAD_CONTENT_TYPE: &str = "application/binary";

/// Joins `server` and `UPLOAD_PATH` with exactly one `/`.
pub fn upload_url(server: &str) -> String {
    format!("{}/{}", server.trim_end_matches('/'), UPLOAD_PATH)
}

/// Builds the HTTP client, applying the optional overall request timeout.
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(limit) = timeout {
        builder = builder.timeout(limit);
    }
    builder
        .build()
        .map_err(|e| MdiError::Network(format!("Failed to build HTTP client: {}", e)).into())
}

/// # Post Archive (`post_archive`)
///
/// Reads the archive at `archive` and posts it to `upload_url(server)`.
///
/// ## Returns
///
/// The full response body as text (possibly empty).
pub async fn post_archive(
    client: &reqwest::Client,
    server: &str,
    archive: &Path,
    timeout: Option<Duration>,
) -> Result<String> {
    // The endpoint comes from the server URL alone, never from `archive`.
    let url = upload_url(server);
    // A staged archive that cannot be read is a local filesystem failure.
    let body = tokio::fs::read(archive).await.map_err(|e| {
        MdiError::Io(format!(
            "Failed to read archive {}: {}",
            archive.display(),
            e
        ))
    })?;
    info!("Uploading {} ({} bytes) to {}", archive.display(), body.len(), url);

    let response = client
        .post(&url)
        .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .map_err(|e| classify(e, &url, timeout))?;

    // Read the body before checking the status so a rejection carries the
    // server's own message.
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| classify(e, &url, timeout))?;
    debug!("{} answered {} with {} byte(s)", url, status, text.len());

    if !status.is_success() {
        anyhow::bail!(MdiError::Network(format!(
            "{} returned {}: {}",
            url,
            status,
            text.trim()
        )));
    }
    Ok(text)
}

fn classify(err: reqwest::Error, url: &str, timeout: Option<Duration>) -> anyhow::Error {
    // Only an elapsed client timeout is a `Timeout`; anything else on the wire
    // is a `Network` failure.
    match timeout {
        Some(limit) if err.is_timeout() => MdiError::Timeout {
            cmd: format!("POST {}", url),
            after: limit,
        }
        .into(),
        _ => MdiError::Network(format!("POST {} failed: {}", url, err)).into(),
    }
}
