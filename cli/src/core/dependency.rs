//! # mdi Dependency List
//!
//! File: cli/src/core/dependency.rs
//!
//! ## Overview
//!
//! `DependencyList` is the input every processor consumes: an ordered list of
//! file paths. Order matters, since it decides the member order of archives
//! and the sequence of archiver invocations. Duplicates are kept as given.
//!
//! A list is built once (from command-line arguments and/or a list file) and
//! then lent by shared reference to a single processor, so it cannot change
//! while a processor walks it.
//!
//! ## Usage
//!
//! ```rust
//! let deps: DependencyList = ["a.txt", "b.txt"].into_iter().collect();
//! deps.for_each(|path| println!("{}", path));
//! ```
//!
use crate::core::error::{MdiError, Result};
use anyhow::Context;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// An ordered, immutable list of dependency file paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList {
    paths: Vec<String>,
}

impl DependencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every path in insertion order. Can be called any number of times.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&str),
    {
        for path in &self.paths {
            visitor(path);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reads a list file: one path per line, blank lines and `#` comments
    /// skipped. Paths are taken verbatim, so leading or trailing spaces stay
    /// part of the name.
    ///
    /// A `list_file` of `-` reads from standard input.
    pub fn from_list_file(list_file: &Path) -> Result<Self> {
        if list_file == Path::new("-") {
            debug!("Reading dependency list from stdin");
            return Self::from_reader(io::stdin().lock());
        }

        debug!("Reading dependency list from {}", list_file.display());
        let file = std::fs::File::open(list_file).map_err(|e| {
            MdiError::Io(format!(
                "Cannot open dependency list '{}': {}",
                list_file.display(),
                e
            ))
        })?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read dependency list {}", list_file.display()))
    }

    /// Parses list-file content from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut paths = Vec::new();
        // `lines` already drops the `\n` / `\r\n` terminator; everything else
        // on the line belongs to the path, including edge whitespace.
        for line in reader.lines() {
            let line = line.context("Failed to read line from dependency list")?;
            let content = line.trim_start();
            if content.trim_end().is_empty() || content.starts_with('#') {
                continue;
            }
            paths.push(line);
        }
        Ok(Self { paths })
    }

    /// Appends every path of `other` after the current entries.
    pub fn extend_from(&mut self, other: DependencyList) {
        self.paths.extend(other.paths);
    }
}

impl<S: Into<String>> FromIterator<S> for DependencyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_for_each_preserves_order_and_restarts() {
        let deps: DependencyList = ["b", "a", "c", "a"].into_iter().collect();

        let mut first_pass = Vec::new();
        deps.for_each(|p| first_pass.push(p.to_string()));
        let mut second_pass = Vec::new();
        deps.for_each(|p| second_pass.push(p.to_string()));

        assert_eq!(first_pass, vec!["b", "a", "c", "a"]);
        assert_eq!(first_pass, second_pass);
        assert_eq!(deps.len(), 4);
    }

    #[test]
    fn test_from_reader_skips_blanks_and_comments() -> Result<()> {
        let input = "# generated\nlib/libc.so.6\r\n\n   \n  # indented comment\n#lib/skip.so\nbin/app\n";
        let deps = DependencyList::from_reader(Cursor::new(input))?;
        assert_eq!(
            deps.iter().collect::<Vec<_>>(),
            vec!["lib/libc.so.6", "bin/app"]
        );
        Ok(())
    }

    #[test]
    fn test_from_reader_keeps_edge_whitespace_in_paths() -> Result<()> {
        let input = " leading.txt\ntrailing.txt \nmid dle.txt\n";
        let deps = DependencyList::from_reader(Cursor::new(input))?;
        assert_eq!(
            deps.iter().collect::<Vec<_>>(),
            vec![" leading.txt", "trailing.txt ", "mid dle.txt"]
        );
        Ok(())
    }

    #[test]
    fn test_from_list_file_missing_is_io_error() {
        let dir = tempdir().unwrap();
        let err = DependencyList::from_list_file(&dir.path().join("absent.txt")).unwrap_err();
        assert!(MdiError::is_kind(&err, |e| matches!(e, MdiError::Io(_))));
    }

    #[test]
    fn test_extend_from_appends_in_order() -> Result<()> {
        let dir = tempdir()?;
        let list = dir.path().join("deps.txt");
        std::fs::write(&list, "c\nd\n")?;

        let mut deps: DependencyList = ["a", "b"].into_iter().collect();
        deps.extend_from(DependencyList::from_list_file(&list)?);
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn test_empty_list() {
        let deps = DependencyList::new();
        assert!(deps.is_empty());
        let mut visited = 0;
        deps.for_each(|_| visited += 1);
        assert_eq!(visited, 0);
    }
}
