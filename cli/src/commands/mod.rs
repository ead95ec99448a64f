//! # mdi Commands
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per `mdi` subcommand. The four processing commands (`tar`,
//! `image`, `print`, `upload`) share the same input handling through
//! `DepsArgs` and differ only in the `Processor` they build:
//!
//! 1. Collect the `DependencyList` from positional paths and `--list`.
//! 2. Build the processor from the command's flags and the loaded `Config`.
//! 3. Call `Processor::process` and hand any error back to `main.rs`.
//!
//! `serve` runs the HTTP endpoint that receives uploads.
//!
use crate::core::dependency::DependencyList;
use crate::core::error::Result;
use crate::processor::Processor;
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, trace};

/// `mdi image`: import dependencies as a container image.
pub mod image;
/// `mdi print`: list dependencies on stdout.
pub mod print;
/// `mdi serve`: receive uploaded archives and import them.
pub mod serve;
/// `mdi tar`: write dependencies to a tarball.
pub mod tar;
/// `mdi upload`: post a tarball of dependencies to a server.
pub mod upload;

/// Where the dependency paths come from. Shared by all processing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct DepsArgs {
    /// Dependency file paths, processed in the order given.
    #[arg(value_name = "DEPS")]
    pub deps: Vec<String>,

    /// File with one dependency path per line (`-` for stdin). Its entries
    /// follow the positional paths. Blank lines and `#` comments are skipped.
    #[arg(long, short, value_name = "FILE")]
    pub list: Option<PathBuf>,
}

impl DepsArgs {
    /// Builds the `DependencyList`: positional paths first, then `--list` entries.
    pub fn collect(&self) -> Result<DependencyList> {
        let mut deps: DependencyList = self.deps.iter().cloned().collect();
        if let Some(list) = &self.list {
            deps.extend_from(DependencyList::from_list_file(list)?);
        }
        debug!("Collected {} dependency path(s)", deps.len());
        deps.for_each(|path| trace!("dependency: {}", path));
        Ok(deps)
    }
}

/// Collects the dependencies and runs `processor` over them.
pub(crate) async fn run_processor(processor: Processor, deps: &DepsArgs) -> Result<()> {
    let deps = deps.collect()?;
    processor.process(&deps).await
}
