//! # mdi Upload Command
//!
//! File: cli/src/commands/upload.rs
//!
//! ## Overview
//!
//! `mdi upload` packs the dependencies into a temporary tarball and posts it
//! to `<server>/create_tar`, printing whatever the server answers. The server
//! is taken from `--server`, then `MDI_SERVER`, then `upload.server` in the
//! configuration.
//!
//! ```bash
//! mdi upload --server http://build-host:8000 lib/libz.so.1
//! MDI_SERVER=http://build-host:8000 mdi upload --list deps.txt
//! ```
//!
use super::{run_processor, DepsArgs};
use crate::core::config::Config;
use crate::core::error::{MdiError, Result};
use crate::processor::{Processor, RemoteUploader};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Upload a tarball of the dependencies to an mdi server")]
pub struct UploadArgs {
    /// Base URL of the receiving server, e.g. `http://build-host:8000`.
    #[arg(long, short, env = "MDI_SERVER")]
    server: Option<String>,

    /// Request timeout in seconds (overrides `upload.timeout_secs`).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    #[command(flatten)]
    deps: DepsArgs,
}

pub async fn handle_upload(args: UploadArgs, config: &Config) -> Result<()> {
    let Some(server) = args.server.or_else(|| config.upload.server.clone()) else {
        anyhow::bail!(MdiError::Config(
            "No upload server given; use --server, MDI_SERVER or upload.server".into()
        ));
    };
    info!("Handling upload command (Server: {})", server);

    let mut upload = config.upload.clone();
    if args.timeout.is_some() {
        upload.timeout_secs = args.timeout;
    }

    let uploader = RemoteUploader::new(server, &config.archiver, &upload)?;
    run_processor(Processor::Upload(uploader), &args.deps).await
}
