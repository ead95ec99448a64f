//! # mdi Container Tool Utilities (`common::docker`)
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Interaction with the container tool (`docker` by default, anything with a
//! compatible `import` subcommand such as `podman` via configuration). The
//! tool is driven as an external program, so no daemon connection or API
//! client is involved.
//!
//! - **`import`**: turns a tarball into a named image (`<tool> import <archive> <image>`).
//!
//! ```rust
//! use crate::common::docker;
//!
//! let output = docker::import::import_archive(&config.container, archive.path(), "app:deps").await?;
//! ```
//!

/// Importing tarballs as container images.
pub mod import;
