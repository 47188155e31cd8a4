//! File-descriptor backend.

use crate::backend::Backend;
use crate::error::{BackendError, BackendResult};
use std::fs::{File, OpenOptions};
use std::io::{self, IoSlice, IoSliceMut, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

/// A backend over an owned OS file descriptor.
///
/// Each operation maps 1:1 onto the platform primitive: `readv(2)`,
/// `writev(2)` and `lseek(2)` on Unix. Interrupted system calls are retried;
/// every other failure is reported with its OS error code.
///
/// # Closing
///
/// [`Backend::close`] releases the descriptor by dropping the owned
/// [`File`], so an error reported by `close(2)` itself is not surfaced and
/// the first close always returns `Ok`. Call [`FdBackend::sync`] before
/// closing to observe deferred write errors.
///
/// # Example
///
/// ```no_run
/// use bufstream_backend::{Backend, FdBackend};
/// use std::fs::OpenOptions;
/// use std::io::IoSlice;
/// use std::path::Path;
///
/// let mut options = OpenOptions::new();
/// options.write(true).create(true);
/// let mut backend = FdBackend::open(Path::new("data.bin"), &options).unwrap();
/// backend.writev(&[IoSlice::new(b"hello "), IoSlice::new(b"world")]).unwrap();
/// backend.close().unwrap();
/// ```
#[derive(Debug)]
pub struct FdBackend {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl FdBackend {
    /// Opens the file at `path` with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path, options: &OpenOptions) -> BackendResult<Self> {
        let file = options.open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file: Some(file),
        })
    }

    /// Wraps an already-open file.
    #[must_use]
    pub fn from_file(file: File) -> Self {
        Self {
            path: None,
            file: Some(file),
        }
    }

    /// Takes ownership of an already-open descriptor.
    #[cfg(unix)]
    #[must_use]
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self::from_file(File::from(fd))
    }

    /// Returns the descriptor number, or `None` once closed.
    #[cfg(unix)]
    #[must_use]
    pub fn raw_fd(&self) -> Option<RawFd> {
        self.file.as_ref().map(AsRawFd::as_raw_fd)
    }

    /// Returns the path the backend was opened from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns `true` once [`Backend::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Flushes file data and metadata to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is closed or `fsync(2)` fails.
    pub fn sync(&mut self) -> BackendResult<()> {
        Ok(self.file()?.sync_all()?)
    }

    fn file(&mut self) -> BackendResult<&mut File> {
        self.file.as_mut().ok_or(BackendError::Closed)
    }
}

impl Backend for FdBackend {
    fn close(&mut self) -> BackendResult<()> {
        // Dropping the handle issues close(2).
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(BackendError::Closed),
        }
    }

    fn readv(&mut self, bufs: &mut [IoSliceMut<'_>]) -> BackendResult<usize> {
        let file = self.file()?;
        loop {
            match file.read_vectored(bufs) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn writev(&mut self, bufs: &[IoSlice<'_>]) -> BackendResult<usize> {
        let file = self.file()?;
        loop {
            match file.write_vectored(bufs) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> BackendResult<u64> {
        Ok(self.file()?.seek(pos)?)
    }
}
