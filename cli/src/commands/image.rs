//! # mdi Image Command
//!
//! File: cli/src/commands/image.rs
//!
//! ## Overview
//!
//! `mdi image` packs the dependencies into a temporary tarball and imports it
//! with the container tool as `--name`. The tarball is staged in the current
//! directory and removed afterwards.
//!
//! ```bash
//! mdi image --name app-deps:latest lib/libssl.so.3 lib/libcrypto.so.3
//! mdi image --name app-deps:latest --tool podman --list deps.txt
//! ```
//!
use super::{run_processor, DepsArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::processor::{ImagePackager, Processor};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Import the dependencies as a container image")]
pub struct ImageArgs {
    /// Name (and optional tag) of the image to create, e.g. `app-deps:latest`.
    #[arg(long, short)]
    name: String,

    /// Container tool to run instead of the configured one (e.g. `podman`).
    #[arg(long)]
    tool: Option<String>,

    #[command(flatten)]
    deps: DepsArgs,
}

pub async fn handle_image(args: ImageArgs, config: &Config) -> Result<()> {
    info!(
        "Handling image command (Name: {}, Tool: {:?})",
        args.name, args.tool
    );

    let mut container = config.container.clone();
    if let Some(tool) = args.tool {
        container.program = tool;
    }

    let packager = ImagePackager::new(args.name, &config.archiver, &container);
    run_processor(Processor::Image(packager), &args.deps).await
}
