//! # Print Processor (`processor::print`)
//!
//! File: cli/src/processor/print.rs
//!
//! Lists the dependencies on standard output, one path per line, in list
//! order. Nothing is archived.
//!
use crate::core::dependency::DependencyList;
use crate::core::error::{MdiError, Result};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer;

impl Printer {
    pub fn process(&self, deps: &DependencyList) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_to(deps, &mut out)
    }

    /// Writes each path followed by a newline to `out`.
    pub fn write_to<W: Write>(&self, deps: &DependencyList, out: &mut W) -> Result<()> {
        for dep in deps.iter() {
            writeln!(out, "{}", dep)
                .map_err(|e| MdiError::Io(format!("Failed to write dependency list: {}", e)))?;
        }
        out.flush()
            .map_err(|e| MdiError::Io(format!("Failed to flush output: {}", e)))?;
        Ok(())
    }
}
