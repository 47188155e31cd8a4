//! Positioning: seek, tell, rewind and read-to-write switching.

use crate::error::StreamResult;
use crate::stream::{Stream, BUFFER_START};
use crate::window::Window;
use bufstream_backend::BackendError;
use std::io::SeekFrom;
use tracing::debug;

impl Stream {
    /// Moves the logical position.
    ///
    /// Pending writes are flushed first. For [`SeekFrom::Current`] the
    /// offset is taken relative to the caller's position, which lags the
    /// backend by the number of bytes still buffered for reading. The read
    /// window is dropped only once the backend seek succeeds.
    ///
    /// Returns the new position as reported by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or the backend seek fails, or if the
    /// adjusted offset does not fit in an `i64`.
    pub fn seek(&mut self, pos: SeekFrom) -> StreamResult<u64> {
        self.ensure_open()?;
        self.flush()?;

        let target = match pos {
            SeekFrom::Current(offset) => match self.logical_offset(offset) {
                Ok(offset) => SeekFrom::Current(offset),
                Err(err) => return Err(self.record(err)),
            },
            other => other,
        };

        match self.backend_seek(target) {
            Ok(position) => {
                debug!(?pos, position, "stream seek");
                self.window = Window::Idle;
                Ok(position)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Returns the caller's logical position.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or the backend query fails, or if more
    /// bytes were pushed back than precede the backend position.
    pub fn tell(&mut self) -> StreamResult<u64> {
        self.ensure_open()?;
        self.flush()?;

        let position = match self.backend_seek(SeekFrom::Current(0)) {
            Ok(position) => position,
            Err(err) => return Err(self.record(err)),
        };
        let unread = self.window.unread() as u64;
        match position.checked_sub(unread) {
            Some(logical) => Ok(logical),
            None => Err(self.record(BackendError::InvalidSeek {
                offset: i128::from(position) - i128::from(unread),
            })),
        }
    }

    /// Seeks to the start and clears [`Stream::last_error`].
    ///
    /// # Errors
    ///
    /// Same as [`Stream::seek`].
    pub fn rewind(&mut self) -> StreamResult<()> {
        self.seek(SeekFrom::Start(0))?;
        self.last_error = None;
        Ok(())
    }

    /// Switches the window to writing.
    ///
    /// Bytes fetched ahead for reading are given back first by seeking the
    /// backend to the caller's position, so new bytes land where the caller
    /// expects. If that seek fails the read window is kept.
    pub(crate) fn enter_write_mode(&mut self) -> StreamResult<()> {
        let unread = self.window.unread();
        if unread > 0 {
            let back = match i64::try_from(unread) {
                Ok(n) => SeekFrom::Current(-n),
                Err(_) => {
                    return Err(self.record(BackendError::InvalidSeek {
                        offset: -(unread as i128),
                    }))
                }
            };
            if let Err(err) = self.backend_seek(back) {
                return Err(self.record(err));
            }
        }

        self.window = Window::Writing {
            base: BUFFER_START,
            pos: BUFFER_START,
            end: self.buffer_end(),
        };
        Ok(())
    }

    fn logical_offset(&self, offset: i64) -> Result<i64, BackendError> {
        let unread = self.window.unread();
        i64::try_from(unread)
            .ok()
            .and_then(|unread| offset.checked_sub(unread))
            .ok_or(BackendError::InvalidSeek {
                offset: i128::from(offset) - unread as i128,
            })
    }

    fn backend_seek(&mut self, pos: SeekFrom) -> Result<u64, BackendError> {
        match self.backend.as_deref_mut() {
            Some(backend) => backend.seek(pos),
            None => Err(BackendError::Closed),
        }
    }
}
