//! In-memory backend.

use crate::backend::Backend;
use crate::error::{BackendError, BackendResult};
use parking_lot::RwLock;
use std::io::{IoSlice, IoSliceMut, SeekFrom};
use std::sync::Arc;

/// An in-memory backend with its own cursor.
///
/// The bytes live behind a shared handle, so [`MemoryBackend::reopen`] can
/// hand out a second backend over the same contents after the first stream
/// has been closed, the way a file can be reopened by path. Writes past the
/// end zero-fill the gap.
///
/// # Example
///
/// ```rust
/// use bufstream_backend::{Backend, MemoryBackend};
/// use std::io::IoSlice;
///
/// let mut backend = MemoryBackend::new();
/// backend.writev(&[IoSlice::new(b"test "), IoSlice::new(b"data")]).unwrap();
/// assert_eq!(backend.data(), b"test data");
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<Vec<u8>>>,
    pos: u64,
    closed: bool,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend over pre-existing data, positioned at the start.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            pos: 0,
            closed: false,
        }
    }

    /// Returns a fresh backend over the same bytes, positioned at the start.
    #[must_use]
    pub fn reopen(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            pos: 0,
            closed: false,
        }
    }

    /// Returns a copy of the current contents.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Returns the current contents length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if no bytes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Returns `true` once [`Backend::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> BackendResult<()> {
        if self.closed {
            Err(BackendError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Backend for MemoryBackend {
    fn close(&mut self) -> BackendResult<()> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }

    fn readv(&mut self, bufs: &mut [IoSliceMut<'_>]) -> BackendResult<usize> {
        self.check_open()?;
        let data = self.data.read();
        let mut offset = usize::try_from(self.pos).unwrap_or(usize::MAX);
        let mut total = 0;

        for buf in bufs.iter_mut() {
            if offset >= data.len() {
                break;
            }
            let n = buf.len().min(data.len() - offset);
            buf[..n].copy_from_slice(&data[offset..offset + n]);
            offset += n;
            total += n;
        }

        self.pos += total as u64;
        Ok(total)
    }

    fn writev(&mut self, bufs: &[IoSlice<'_>]) -> BackendResult<usize> {
        self.check_open()?;
        let mut data = self.data.write();
        let start = usize::try_from(self.pos).map_err(|_| BackendError::InvalidSeek {
            offset: i128::from(self.pos),
        })?;
        if start > data.len() {
            data.resize(start, 0);
        }

        let mut offset = start;
        for buf in bufs {
            let overlap = buf.len().min(data.len().saturating_sub(offset));
            data[offset..offset + overlap].copy_from_slice(&buf[..overlap]);
            data.extend_from_slice(&buf[overlap..]);
            offset += buf.len();
        }

        let total = offset - start;
        self.pos += total as u64;
        Ok(total)
    }

    fn seek(&mut self, pos: SeekFrom) -> BackendResult<u64> {
        self.check_open()?;
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(delta) => i128::from(self.pos) + i128::from(delta),
            SeekFrom::End(delta) => self.data.read().len() as i128 + i128::from(delta),
        };

        let new_pos = u64::try_from(target).map_err(|_| BackendError::InvalidSeek { offset: target })?;
        self.pos = new_pos;
        Ok(new_pos)
    }
}
