//! # mdi Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Archive handling for the packaging processors. `tar` builds tarballs from a
//! dependency list with the external archiver and reads them back with the
//! `tar` crate.
//!
//! ```rust
//! use crate::common::archive::tar::TarballBuilder;
//!
//! TarballBuilder::from_config(&config.archiver)
//!     .build(Path::new("deps.tar"), &deps)
//!     .await?;
//! ```
//!

pub mod tar;
