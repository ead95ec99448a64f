//! # mdi Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! `mdi` collects a list of dependency files and hands it to one processor:
//! a tarball, a container image, a plain listing, or an upload to a remote
//! `mdi serve`. This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the layered configuration
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Bundle two libraries into a tarball
//! mdi tar --output deps.tar /usr/lib/libssl.so.3 /usr/lib/libcrypto.so.3
//!
//! # Import a list of files as an image, with debug logging
//! mdi -vv image --name app-deps:latest --list deps.txt
//!
//! # Send them to a build host running `mdi serve`
//! mdi upload --server http://build-host:8000 --list deps.txt
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (logs go to stderr)
//! 3. Load configuration (defaults, user, project, `--config`)
//! 4. Route to the command handler
//! 5. Report any error and exit with status 1
//!
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // One module per subcommand
mod common; // Shared utilities (archiver, container tool, HTTP, temp files)
mod core; // Errors, configuration, dependency list
mod processor; // The processing strategies

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "mdi",
    about = "Package dependency files as a tarball, a container image, or an upload",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Extra configuration file, applied over user and project configuration.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "t")]
    Tar(commands::tar::TarArgs),
    #[command(alias = "i")]
    Image(commands::image::ImageArgs),
    #[command(alias = "p")]
    Print(commands::print::PrintArgs),
    #[command(alias = "u")]
    Upload(commands::upload::UploadArgs),
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments first; clap exits on its own for --help, --version and usage errors.
    let cli = Cli::parse();

    // Map -v counts to a level. RUST_LOG, when set, takes precedence.
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    // Load layered configuration, then route to the handler for the subcommand.
    let command_result = match core::config::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Tar(args) => commands::tar::handle_tar(args, &config).await,
            Commands::Image(args) => commands::image::handle_image(args, &config).await,
            Commands::Print(args) => commands::print::handle_print(args).await,
            Commands::Upload(args) => commands::upload::handle_upload(args, &config).await,
            Commands::Serve(args) => commands::serve::handle_serve(args, &config).await,
        },
        Err(e) => Err(e),
    };

    // Report the whole context chain and exit non-zero on failure.
    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
