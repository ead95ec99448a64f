//! # mdi Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the processors and `mdi serve`:
//!
//! - **`temp`**: `TempArchive`, the self-deleting staging file for tarballs.
//!
//! ```rust
//! use crate::common::fs::temp::TempArchive;
//!
//! let staging = TempArchive::new_in(&work_dir)?;
//! ```
//!

/// Self-deleting temporary archive files.
pub mod temp;
