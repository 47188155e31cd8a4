//! CLI command implementations.

pub mod cat;
pub mod copy;
pub mod demo;
pub mod inspect;
pub mod write;

use bufstream_core::StreamError;
use std::io;
use thiserror::Error;

/// Result type for command implementations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A stream operation failed.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Writing to stdout failed.
    #[error("output error: {0}")]
    Output(#[from] io::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination accepted fewer bytes than were read.
    #[error("short write: {written} of {read} bytes written")]
    ShortWrite {
        /// Bytes read from the source.
        read: u64,
        /// Bytes accepted by the destination.
        written: u64,
    },

    /// Data read back differs from what was written.
    #[error("read back {actual} bytes, expected {expected}")]
    Mismatch {
        /// Expected byte count.
        expected: usize,
        /// Byte count actually read.
        actual: usize,
    },
}

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}
