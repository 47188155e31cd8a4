//! Error types for stream operations.

use bufstream_backend::BackendError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur in stream operations.
///
/// Transfers that move fewer bytes than requested are not errors; they are
/// reported as `Ok` with the shorter count.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The backend could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying backend failure.
        #[source]
        source: BackendError,
    },

    /// The stream buffer could not be allocated.
    #[error("cannot allocate a {requested}-byte stream buffer")]
    OutOfMemory {
        /// Requested buffer size in bytes.
        requested: usize,
    },

    /// A backend read, write, seek or close failed.
    #[error("I/O error: {0}")]
    Io(#[from] BackendError),

    /// The fopen-style mode string is not valid.
    #[error("invalid open mode: {0:?}")]
    InvalidMode(String),

    /// No room left in front of the read window for pushed-back bytes.
    #[error("unget buffer is full")]
    UngetFull,

    /// The stream has been closed.
    #[error("stream is closed")]
    Closed,
}

impl StreamError {
    /// Returns the closest [`io::ErrorKind`] for this error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Open { source, .. } | Self::Io(source) => source.code().kind,
            Self::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            Self::InvalidMode(_) => io::ErrorKind::InvalidInput,
            Self::UngetFull => io::ErrorKind::Other,
            Self::Closed => io::ErrorKind::NotConnected,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(BackendError::Io(inner)) => inner,
            other => {
                let kind = other.kind();
                io::Error::new(kind, other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_io_error_passes_through() {
        let err = StreamError::Io(BackendError::Io(io::Error::from_raw_os_error(28)));
        let io_err = io::Error::from(err);
        assert_eq!(io_err.raw_os_error(), Some(28));
    }

    #[test]
    fn closed_converts_to_not_connected() {
        let io_err = io::Error::from(StreamError::Closed);
        assert_eq!(io_err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn open_error_reports_source_kind() {
        let err = StreamError::Open {
            path: PathBuf::from("missing"),
            source: BackendError::Io(io::Error::from(io::ErrorKind::NotFound)),
        };
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing"));
    }
}
