//! # mdi Serve Command
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `mdi serve` is the receiving end of `mdi upload`. It listens for
//! `POST /create_tar` requests, checks that the body is a readable, non-empty
//! tar archive, and imports it with the container tool.
//!
//! ```bash
//! # Accept uploads on all interfaces, importing them as build-deps:latest
//! mdi serve --host 0.0.0.0 --port 8000 --image build-deps:latest
//!
//! # A client may pick the image name per request
//! curl --data-binary @deps.tar "http://build-host:8000/create_tar?image=app:deps"
//! ```
//!
//! Settings come from the `[serve]` configuration section; flags override them.
//!
use crate::core::config::{Config, ServeConfig};
use crate::core::error::{MdiError, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Contains the axum-based upload receiver.
pub mod server_logic;

#[derive(Parser, Debug)]
#[command(about = "Receive uploaded tarballs and import them as images")]
pub struct ServeArgs {
    /// Address to bind (default from config, else 127.0.0.1).
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (default from config, else 8000).
    #[arg(long, short)]
    port: Option<u16>,

    /// Image name used when a request does not pass `?image=`.
    #[arg(long, short)]
    image: Option<String>,

    /// Directory for temporary archives (default: current directory).
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

/// Lays the command-line flags over the `[serve]` configuration.
fn merge(args: ServeArgs, base: &ServeConfig) -> ServeConfig {
    ServeConfig {
        host: args.host.unwrap_or(base.host),
        port: args.port.unwrap_or(base.port),
        image: args.image.unwrap_or_else(|| base.image.clone()),
        work_dir: args.work_dir.unwrap_or_else(|| base.work_dir.clone()),
    }
}

/// Makes sure uploads can be staged in `dir` and returns its absolute path.
///
/// The directory is created with its parents when missing. An existing path
/// that is not a directory is an `MdiError::Io`.
fn prepare_work_dir(dir: &Path) -> Result<PathBuf> {
    // `create_dir_all` succeeds on an existing directory and fails on a file.
    std::fs::create_dir_all(dir).map_err(|e| {
        MdiError::Io(format!(
            "Cannot use '{}' as staging directory: {}",
            dir.display(),
            e
        ))
    })?;
    // Resolve once so the banner and every log line show the same location.
    let resolved = dir.canonicalize().map_err(|e| {
        MdiError::Io(format!("Cannot resolve '{}': {}", dir.display(), e))
    })?;
    debug!("Staging uploads in {}", resolved.display());
    Ok(resolved)
}

pub async fn handle_serve(args: ServeArgs, config: &Config) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let mut serve = merge(args, &config.serve);
    serve.work_dir = prepare_work_dir(&serve.work_dir)?;
    info!("Effective serve config: {:?}", serve);

    server_logic::run_server(serve, config.container.clone()).await
}
