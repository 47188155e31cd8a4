//! Write path: write, writev, print and flush.

use crate::error::{StreamError, StreamResult};
use crate::stream::{Stream, BUFFER_START};
use crate::window::Window;
use bufstream_backend::BackendError;
use std::fmt;
use std::io::{self, IoSlice};
use tracing::trace;

impl Stream {
    /// Writes `src` through the buffer.
    ///
    /// Returns the number of bytes accepted. A count below `src.len()`
    /// means the backend failed after all previously buffered bytes had
    /// been flushed and part of `src` had been written; the cause is kept in
    /// [`Stream::last_error`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails while previously buffered
    /// bytes are still outstanding, or before any byte of `src` was
    /// written. The buffered bytes are discarded in that case.
    pub fn write(&mut self, src: &[u8]) -> StreamResult<usize> {
        self.ensure_open()?;
        self.last_error = None;
        if src.is_empty() {
            return Ok(0);
        }
        self.buffer_write(src)
    }

    /// Writes several slices in order, as if by consecutive
    /// [`Stream::write`] calls.
    ///
    /// Stops at the first slice that is not written completely. The count
    /// returned covers only bytes that are either still buffered or known to
    /// have reached the backend: bytes from earlier slices that a later
    /// failure discarded from the buffer are not counted.
    ///
    /// # Errors
    ///
    /// Returns an error if none of the bytes offered survived, either because
    /// the first slice failed or because a later failure discarded every
    /// byte buffered so far.
    pub fn writev(&mut self, bufs: &[IoSlice<'_>]) -> StreamResult<usize> {
        self.ensure_open()?;
        self.last_error = None;

        let mut total = 0;
        // Bytes of this call still sitting in the write buffer.
        let mut unflushed = 0;
        for buf in bufs.iter().filter(|buf| !buf.is_empty()) {
            match self.buffer_write(buf) {
                Ok(n) => {
                    total += n;
                    unflushed = self.window.pending().min(total);
                    if n < buf.len() {
                        break;
                    }
                }
                Err(err) => {
                    let accepted = total - unflushed;
                    if accepted == 0 {
                        return Err(err);
                    }
                    trace!(accepted, discarded = unflushed, "writev cut short");
                    return Ok(accepted);
                }
            }
        }
        Ok(total)
    }

    /// Formats `args` and writes the result.
    ///
    /// ```rust
    /// use bufstream_core::{MemoryBackend, Stream, StreamConfig};
    ///
    /// let backend = MemoryBackend::new();
    /// let mut stream = Stream::memory(backend.reopen(), StreamConfig::default()).unwrap();
    /// stream.print(format_args!("{}-{}", 1, "two")).unwrap();
    /// stream.flush().unwrap();
    /// assert_eq!(backend.data(), b"1-two");
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`Stream::write`].
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> StreamResult<usize> {
        match args.as_str() {
            Some(text) => self.write(text.as_bytes()),
            None => self.write(args.to_string().as_bytes()),
        }
    }

    /// Pushes buffered bytes to the backend.
    ///
    /// A no-op when nothing is pending, so flushing twice costs one backend
    /// call at most.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; the buffered bytes are
    /// discarded in that case.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.ensure_open()?;
        if self.window.pending() > 0 {
            self.buffer_write(&[])?;
        }
        Ok(())
    }

    /// Enters write mode if needed and writes `src` through the buffer; an
    /// empty `src` forces the buffered bytes out.
    fn buffer_write(&mut self, src: &[u8]) -> StreamResult<usize> {
        let (mut base, pos, end) = match self.window {
            Window::Writing { base, pos, end } => (base, pos, end),
            _ => {
                self.enter_write_mode()?;
                (BUFFER_START, BUFFER_START, self.buffer_end())
            }
        };

        if !src.is_empty() && end > pos + src.len() {
            self.buf[pos..pos + src.len()].copy_from_slice(src);
            self.window = Window::Writing {
                base,
                pos: pos + src.len(),
                end,
            };
            return Ok(src.len());
        }

        let mut written = 0;
        let mut remaining = (pos - base) + src.len();
        loop {
            let result = {
                let backend = self.backend.as_deref_mut().ok_or(StreamError::Closed)?;
                let rest = IoSlice::new(&src[written..]);
                if base < pos {
                    backend.writev(&[IoSlice::new(&self.buf[base..pos]), rest])
                } else {
                    backend.writev(&[rest])
                }
            };
            let result = match result {
                Ok(0) if remaining > 0 => Err(BackendError::Io(io::ErrorKind::WriteZero.into())),
                other => other,
            };

            let n = match result {
                Ok(n) => n,
                Err(err) => {
                    let buffered_outstanding = base < pos;
                    self.window = Window::Idle;
                    let err = self.record(err);
                    if buffered_outstanding || written == 0 {
                        return Err(err);
                    }
                    return Ok(written);
                }
            };
            trace!(offered = remaining, accepted = n, "backend writev");

            if n >= remaining {
                self.window = Window::Writing {
                    base: BUFFER_START,
                    pos: BUFFER_START,
                    end: self.buffer_end(),
                };
                return Ok(src.len());
            }

            remaining -= n;
            let buffered = pos - base;
            if n >= buffered {
                base = pos;
                written += n - buffered;
            } else {
                base += n;
            }
        }
    }
}
