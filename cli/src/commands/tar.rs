//! # mdi Tar Command
//!
//! File: cli/src/commands/tar.rs
//!
//! ## Overview
//!
//! `mdi tar` writes the dependencies into a tarball at `--output`, adding
//! them in the order given.
//!
//! ```bash
//! mdi tar --output deps.tar lib/libc.so.6 bin/app
//! ldd-deps bin/app | mdi tar -o deps.tar --list -
//! ```
//!
use super::{run_processor, DepsArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::processor::{Processor, TarballProcessor};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Write the dependencies into a tarball")]
pub struct TarArgs {
    /// Path of the tarball to create (overwritten if it exists).
    #[arg(long, short)]
    output: PathBuf,

    /// Add every file in one archiver call instead of one call per file.
    #[arg(long)]
    batch: bool,

    #[command(flatten)]
    deps: DepsArgs,
}

pub async fn handle_tar(args: TarArgs, config: &Config) -> Result<()> {
    info!("Handling tar command (Output: {})", args.output.display());

    let mut archiver = config.archiver.clone();
    archiver.batch |= args.batch;

    let processor = Processor::Tarball(TarballProcessor::new(&args.output, &archiver));
    run_processor(processor, &args.deps).await
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tar_args() {
        let args = TarArgs::try_parse_from(["tar", "-o", "out.tar", "a.txt", "b.txt", "--batch"])
            .unwrap();
        assert_eq!(args.output, PathBuf::from("out.tar"));
        assert!(args.batch);
        assert_eq!(args.deps.deps, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_tar_requires_output() {
        assert!(TarArgs::try_parse_from(["tar", "a.txt"]).is_err());
    }
}
