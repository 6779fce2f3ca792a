// SPDX-License-Identifier: MIT OR Apache-2.0

//! The on-disk pending buffer holding undelivered metric lines.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Newline-delimited file of metric lines that failed to send.
///
/// The file is read in full at the start of every publish attempt and
/// rewritten in full at the end; it is never appended to mid-operation. At
/// most one process is expected to touch the file at a time; no advisory
/// locking is taken.
#[derive(Debug, Clone)]
pub struct PendingBuffer {
    path: PathBuf,
}

impl PendingBuffer {
    /// Create a buffer backed by the given file path. The file itself is
    /// created lazily by the first failed delivery.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the buffer file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all pending lines, oldest first.
    ///
    /// A missing or unreadable file means nothing is pending; an unreadable
    /// file additionally logs a warning.
    #[must_use]
    pub fn load(&self) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => content
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(
                    "Ignoring unreadable pending buffer {}: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the buffer file with the given lines.
    ///
    /// An empty slice truncates the file to empty. The write replaces the
    /// whole file; the buffer is never appended to.
    pub fn store(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PendingBuffer::new(dir.path().join("pending.txt"));
        assert!(buffer.load().is_empty());
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PendingBuffer::new(dir.path().join("pending.txt"));

        let lines = vec!["a 1 100".to_string(), "b 2 100".to_string()];
        buffer.store(&lines).unwrap();
        assert_eq!(buffer.load(), lines);
    }

    #[test]
    fn test_store_empty_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PendingBuffer::new(dir.path().join("pending.txt"));

        buffer.store(&["x 1 1".to_string()]).unwrap();
        buffer.store(&[]).unwrap();

        assert!(buffer.load().is_empty());
        assert_eq!(fs::read_to_string(buffer.path()).unwrap(), "");
    }

    #[test]
    fn test_store_overwrites_instead_of_appending() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PendingBuffer::new(dir.path().join("pending.txt"));

        buffer.store(&["old 1 1".to_string()]).unwrap();
        buffer.store(&["new 2 2".to_string()]).unwrap();

        assert_eq!(buffer.load(), vec!["new 2 2".to_string()]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending.txt");
        fs::write(&path, "a 1 1\n\nb 2 2\n").unwrap();

        let buffer = PendingBuffer::new(&path);
        assert_eq!(buffer.load(), vec!["a 1 1".to_string(), "b 2 2".to_string()]);
    }
}
