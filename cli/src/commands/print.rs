//! # mdi Print Command
//!
//! File: cli/src/commands/print.rs
//!
//! `mdi print` lists the collected dependencies on stdout, one per line. It
//! is mostly useful for checking what a `--list` file resolves to.
//!
use super::{run_processor, DepsArgs};
use crate::core::error::Result;
use crate::processor::{Printer, Processor};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Print the dependency paths, one per line")]
pub struct PrintArgs {
    #[command(flatten)]
    deps: DepsArgs,
}

pub async fn handle_print(args: PrintArgs) -> Result<()> {
    tracing::info!("Handling print command");
    run_processor(Processor::Print(Printer), &args.deps).await
}
