//! Backend trait definition.

use crate::error::BackendResult;
use std::io::{IoSlice, IoSliceMut, SeekFrom};

/// An unbuffered I/O source underneath a buffered stream.
///
/// Backends are **raw byte channels**. They move bytes between memory and
/// the underlying resource exactly as asked and never buffer on their own;
/// all buffering policy lives in the stream layer above.
///
/// # Invariants
///
/// - `readv` returning `Ok(0)` for a non-empty request means end of input
/// - `writev` may accept fewer bytes than offered without that being an error
/// - `seek` returns the new absolute position
/// - `close` releases the resource exactly once; afterwards every operation
///   fails with [`crate::BackendError::Closed`]
///
/// # Implementors
///
/// - [`super::FdBackend`] - OS file descriptors
/// - [`super::MemoryBackend`] - Shared in-memory bytes
pub trait Backend: Send + std::fmt::Debug {
    /// Releases the underlying resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource was already closed or if releasing
    /// it fails.
    fn close(&mut self) -> BackendResult<()>;

    /// Scatter read: fills `bufs` in order and returns the number of bytes
    /// read.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn readv(&mut self, bufs: &mut [IoSliceMut<'_>]) -> BackendResult<usize>;

    /// Gather write: writes `bufs` in order and returns the number of bytes
    /// accepted, which may be less than the total offered.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write fails.
    fn writev(&mut self, bufs: &[IoSlice<'_>]) -> BackendResult<usize>;

    /// Repositions the backend relative to the start, current position or
    /// end.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not seekable or the resulting
    /// position is invalid.
    fn seek(&mut self, pos: SeekFrom) -> BackendResult<u64>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn close(&mut self) -> BackendResult<()> {
        (**self).close()
    }

    fn readv(&mut self, bufs: &mut [IoSliceMut<'_>]) -> BackendResult<usize> {
        (**self).readv(bufs)
    }

    fn writev(&mut self, bufs: &[IoSlice<'_>]) -> BackendResult<usize> {
        (**self).writev(bufs)
    }

    fn seek(&mut self, pos: SeekFrom) -> BackendResult<u64> {
        (**self).seek(pos)
    }
}
