//! Test fixtures for on-disk streams.
//!
//! Provides temporary files that clean themselves up and ready-made
//! backends over them.

use bufstream_backend::FdBackend;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A file inside a temporary directory, removed on drop.
pub struct TempFile {
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TempFile {
    /// Creates a path for a file that does not exist yet.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: temp_dir.path().join(name),
            _temp_dir: temp_dir,
        }
    }

    /// Creates a file with the given contents.
    pub fn with_contents(name: &str, contents: &[u8]) -> Self {
        let file = Self::new(name);
        std::fs::write(&file.path, contents).expect("Failed to write fixture contents");
        file
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current file contents.
    pub fn contents(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read fixture contents")
    }

    /// Opens a read-write backend over the file, creating it if needed.
    pub fn backend(&self) -> FdBackend {
        FdBackend::open(&self.path, &read_write()).expect("Failed to open fixture backend")
    }
}

/// Options for opening a file for reading and writing, creating it if missing.
pub fn read_write() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);
    options
}

/// Builds the bytes of `pattern` repeated `times` times.
pub fn repeated(pattern: &[u8], times: usize) -> Vec<u8> {
    pattern.repeat(times)
}
