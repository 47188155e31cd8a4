//! Stream handle, construction and teardown.

use crate::config::{StreamConfig, UNGET_SIZE};
use crate::error::{StreamError, StreamResult};
use crate::mode::parse_mode;
use crate::window::Window;
use bufstream_backend::{Backend, BackendError, ErrorCode, FdBackend, MemoryBackend};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, warn};

#[cfg(unix)]
use std::os::fd::OwnedFd;

/// Offset of the first buffer byte, just past the unget prefix.
pub(crate) const BUFFER_START: usize = UNGET_SIZE;

/// A buffered stream over an unbuffered [`Backend`].
///
/// `Stream` owns one fixed-size buffer and uses it either as a read window
/// (bytes fetched ahead of the caller) or as a write window (bytes accepted
/// but not yet flushed), never both. Switching direction or seeking
/// flushes or discards the window so the backend position and the
/// caller's logical position agree again.
///
/// # Buffering
///
/// - Reads fill the caller's memory and the buffer with one vectored read
/// - Small writes are copied into the buffer; a full buffer is flushed
///   together with the new bytes in one vectored write
/// - A zero-sized buffer turns every operation into a direct backend call
///
/// # Ownership
///
/// A stream has a single owner and every operation takes `&mut self`;
/// share one across threads only behind external locking.
///
/// # Closing
///
/// [`Stream::close`] flushes, then releases the backend. If the flush
/// fails the backend stays open so the caller can inspect the error or
/// retry. Dropping an open stream closes it on a best-effort basis.
#[derive(Debug)]
pub struct Stream {
    /// `None` once closed.
    pub(crate) backend: Option<Box<dyn Backend>>,
    /// Unget prefix followed by `buffer_size` buffer bytes.
    pub(crate) buf: Vec<u8>,
    pub(crate) buffer_size: usize,
    pub(crate) window: Window,
    pub(crate) last_error: Option<ErrorCode>,
}

impl Stream {
    /// Wraps `backend` in a stream configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfMemory`] if the buffer cannot be
    /// allocated.
    pub fn from_backend(backend: Box<dyn Backend>, config: StreamConfig) -> StreamResult<Self> {
        let len = UNGET_SIZE
            .checked_add(config.buffer_size)
            .ok_or(StreamError::OutOfMemory {
                requested: config.buffer_size,
            })?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| StreamError::OutOfMemory {
                requested: config.buffer_size,
            })?;
        buf.resize(len, 0);

        Ok(Self {
            backend: Some(backend),
            buf,
            buffer_size: config.buffer_size,
            window: Window::Idle,
            last_error: None,
        })
    }

    /// Opens the file at `path` with an fopen-style `mode` and the default
    /// buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidMode`] for a bad mode string and
    /// [`StreamError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, mode: &str) -> StreamResult<Self> {
        let options = parse_mode(mode)?.to_open_options();
        Self::open_with(path, &options, StreamConfig::default())
    }

    /// Opens the file at `path` with explicit [`OpenOptions`].
    ///
    /// The options reach the platform open call unchanged, including Unix
    /// permission bits set through `OpenOptionsExt::mode`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Open`] if the file cannot be opened.
    pub fn open_with(
        path: impl AsRef<Path>,
        options: &OpenOptions,
        config: StreamConfig,
    ) -> StreamResult<Self> {
        let path = path.as_ref();
        let backend = FdBackend::open(path, options).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, buffer_size = config.buffer_size, "opened file stream");
        Self::from_backend(Box::new(backend), config)
    }

    /// Wraps an already-open descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfMemory`] if the buffer cannot be
    /// allocated.
    #[cfg(unix)]
    pub fn from_fd(fd: OwnedFd, config: StreamConfig) -> StreamResult<Self> {
        Self::from_backend(Box::new(FdBackend::from_fd(fd)), config)
    }

    /// Wraps an in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfMemory`] if the buffer cannot be
    /// allocated.
    pub fn memory(backend: MemoryBackend, config: StreamConfig) -> StreamResult<Self> {
        Self::from_backend(Box::new(backend), config)
    }

    /// Flushes pending writes, then closes the backend and frees the buffer.
    ///
    /// # Errors
    ///
    /// If the flush fails, the error is returned and the stream stays open.
    /// If the backend close fails, the error is returned and the stream is
    /// closed regardless. Closing a closed stream returns
    /// [`StreamError::Closed`].
    pub fn close(&mut self) -> StreamResult<()> {
        self.ensure_open()?;
        self.flush()?;

        let mut backend = self.backend.take().ok_or(StreamError::Closed)?;
        let result = backend.close();
        self.buf = Vec::new();
        self.window = Window::Idle;

        match result {
            Ok(()) => {
                debug!("stream closed");
                Ok(())
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Returns the most recent backend failure, if any.
    ///
    /// Cleared at the start of every read and write call, so after a
    /// successful partial transfer this still tells why it stopped short.
    #[must_use]
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Returns the buffer capacity; zero for an unbuffered stream.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns `true` if the stream buffers I/O.
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        self.buffer_size > 0
    }

    /// Returns `true` once the stream has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    /// Returns the number of bytes fetched ahead and not yet read.
    #[must_use]
    pub fn buffered_read_len(&self) -> usize {
        self.window.unread()
    }

    /// Returns the number of bytes written but not yet flushed.
    #[must_use]
    pub fn pending_write_len(&self) -> usize {
        self.window.pending()
    }

    pub(crate) fn ensure_open(&self) -> StreamResult<()> {
        if self.backend.is_some() {
            Ok(())
        } else {
            Err(StreamError::Closed)
        }
    }

    /// Keeps the failure code for [`Stream::last_error`] and wraps the error.
    pub(crate) fn record(&mut self, err: BackendError) -> StreamError {
        self.last_error = Some(err.code());
        StreamError::Io(err)
    }

    pub(crate) fn buffer_end(&self) -> usize {
        BUFFER_START + self.buffer_size
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        if self.backend.is_some() {
            if let Err(err) = self.close() {
                warn!(error = %err, "failed to close stream on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bufstream_testkit::{FaultyBackend, Step, TempFile};
    use std::io;

    #[test]
    fn memory_stream_starts_idle() {
        let stream = Stream::memory(MemoryBackend::new(), StreamConfig::default()).unwrap();
        assert!(stream.is_buffered());
        assert!(!stream.is_closed());
        assert_eq!(stream.buffer_size(), 8192);
        assert_eq!(stream.buf.len(), UNGET_SIZE + 8192);
        assert_eq!(stream.window, Window::Idle);
        assert!(stream.last_error().is_none());
    }

    #[test]
    fn unbuffered_stream_keeps_unget_prefix() {
        let stream = Stream::memory(MemoryBackend::new(), StreamConfig::unbuffered()).unwrap();
        assert!(!stream.is_buffered());
        assert_eq!(stream.buf.len(), UNGET_SIZE);
    }

    #[test]
    fn open_missing_file_reports_open_failure() {
        let file = TempFile::new("missing.bin");
        let err = Stream::open(file.path(), "r").unwrap_err();
        assert!(matches!(err, StreamError::Open { .. }));
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn open_rejects_bad_mode() {
        let file = TempFile::new("data.bin");
        assert!(matches!(
            Stream::open(file.path(), "q"),
            Err(StreamError::InvalidMode(_))
        ));
        assert!(!file.path().exists());
    }

    #[test]
    fn close_flushes_then_releases() {
        let backend = MemoryBackend::new();
        let mut stream = Stream::memory(backend.reopen(), StreamConfig::default()).unwrap();
        stream.write(b"buffered").unwrap();
        assert!(backend.is_empty());

        stream.close().unwrap();
        assert!(stream.is_closed());
        assert!(stream.buf.is_empty());
        assert_eq!(backend.data(), b"buffered");
    }

    #[test]
    fn operations_after_close_fail() {
        let mut stream = Stream::memory(MemoryBackend::new(), StreamConfig::default()).unwrap();
        stream.close().unwrap();

        let mut buf = [0u8; 4];
        assert!(matches!(stream.read(&mut buf), Err(StreamError::Closed)));
        assert!(matches!(stream.write(b"x"), Err(StreamError::Closed)));
        assert!(matches!(stream.close(), Err(StreamError::Closed)));
    }

    #[test]
    fn failed_flush_keeps_backend_open() {
        let (backend, faults) = FaultyBackend::new(MemoryBackend::new());
        let mut stream = Stream::from_backend(Box::new(backend), StreamConfig::default()).unwrap();
        stream.write(b"pending").unwrap();

        faults.push_write(Step::Fail(io::ErrorKind::Other));
        assert!(stream.close().is_err());
        assert!(!stream.is_closed());
        assert_eq!(faults.calls().close, 0);
        assert_eq!(stream.last_error().unwrap().kind, io::ErrorKind::Other);

        // The failed flush invalidated the window, so the retry has nothing
        // left to flush.
        stream.close().unwrap();
        assert_eq!(faults.calls().close, 1);
    }

    #[test]
    fn failed_backend_close_still_closes_stream() {
        let (backend, faults) = FaultyBackend::new(MemoryBackend::new());
        let mut stream = Stream::from_backend(Box::new(backend), StreamConfig::default()).unwrap();

        faults.push_close(Step::Fail(io::ErrorKind::Interrupted));
        assert!(matches!(stream.close(), Err(StreamError::Io(_))));
        assert!(stream.is_closed());
        assert_eq!(
            stream.last_error().unwrap().kind,
            io::ErrorKind::Interrupted
        );
    }

    #[test]
    fn drop_flushes_pending_writes() {
        let backend = MemoryBackend::new();
        {
            let mut stream = Stream::memory(backend.reopen(), StreamConfig::default()).unwrap();
            stream.write(b"dropped").unwrap();
        }
        assert_eq!(backend.data(), b"dropped");
    }

    #[test]
    fn open_file_write_then_read() {
        let file = TempFile::new("data.bin");
        let mut stream = Stream::open(file.path(), "w").unwrap();
        stream.write(b"on disk").unwrap();
        stream.close().unwrap();

        let mut stream = Stream::open(file.path(), "r").unwrap();
        let mut buf = [0u8; 32];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"on disk");
    }
}
