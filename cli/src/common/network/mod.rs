//! # mdi Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! HTTP plumbing shared by both ends of an upload:
//!
//! - **`http`**: the client side. Builds the `<server>/create_tar` endpoint URL
//!   and posts archive bytes to it with `reqwest`.
//!
//! The receiving side lives in `commands::serve`, which mounts its handler on
//! the same `UPLOAD_PATH`.
//!

/// HTTP client for archive uploads.
pub mod http;
