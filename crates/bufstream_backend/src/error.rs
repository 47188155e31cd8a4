//! Error types for backend operations.

use std::io;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur during backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A seek would move the position before the start of the data.
    #[error("invalid seek to offset {offset}")]
    InvalidSeek {
        /// The resulting (negative or overflowing) absolute offset.
        offset: i128,
    },

    /// The backend has already been closed.
    #[error("backend is closed")]
    Closed,
}

impl BackendError {
    /// Returns the copyable error code describing this failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io(err) => ErrorCode {
                kind: err.kind(),
                raw_os_error: err.raw_os_error(),
            },
            Self::InvalidSeek { .. } => ErrorCode::from_kind(io::ErrorKind::InvalidInput),
            Self::Closed => ErrorCode::from_kind(io::ErrorKind::NotConnected),
        }
    }
}

/// A compact, copyable description of a backend failure.
///
/// Streams keep the most recent one around so it can still be queried after
/// the failing call has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// The error category.
    pub kind: io::ErrorKind,
    /// The OS error number, when the failure came from the OS.
    pub raw_os_error: Option<i32>,
}

impl ErrorCode {
    /// Creates a code that carries only an error kind.
    #[must_use]
    pub const fn from_kind(kind: io::ErrorKind) -> Self {
        Self {
            kind,
            raw_os_error: None,
        }
    }
}

impl From<ErrorCode> for io::Error {
    fn from(code: ErrorCode) -> Self {
        match code.raw_os_error {
            Some(errno) => io::Error::from_raw_os_error(errno),
            None => io::Error::from(code.kind),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.raw_os_error {
            Some(errno) => write!(f, "{} (os error {})", io::Error::from(self.kind), errno),
            None => write!(f, "{}", io::Error::from(self.kind)),
        }
    }
}
