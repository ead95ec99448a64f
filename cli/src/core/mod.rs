//! # mdi Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command and processor:
//! - `config`: layered configuration loading and validation
//! - `dependency`: the ordered `DependencyList` processors consume
//! - `error`: the `MdiError` taxonomy and the `Result` alias
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::dependency::DependencyList;
//! use crate::core::error::{MdiError, Result};
//! ```
//!
pub mod config;
pub mod dependency;
pub mod error;
