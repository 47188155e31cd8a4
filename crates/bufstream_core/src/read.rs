//! Read path: read, readahead and unget.

use crate::error::{StreamError, StreamResult};
use crate::stream::{Stream, BUFFER_START};
use crate::window::Window;
use std::io::IoSliceMut;
use tracing::trace;

impl Stream {
    /// Reads up to `dest.len()` bytes.
    ///
    /// Buffered bytes are delivered first. The rest comes from one vectored
    /// read per backend call: the first segment is the caller's memory and
    /// the second is the stream buffer, so whatever the backend returns past
    /// the request stays buffered for the next call.
    ///
    /// Returns the number of bytes delivered. A count below `dest.len()`
    /// means end of input or a failure after some bytes had been delivered
    /// (see [`Stream::last_error`]). `Ok(0)` for a non-empty `dest` means
    /// end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing pending writes fails, or if the backend
    /// fails before any byte was delivered.
    pub fn read(&mut self, dest: &mut [u8]) -> StreamResult<usize> {
        self.ensure_open()?;
        self.flush()?;
        self.last_error = None;
        if dest.is_empty() {
            return Ok(0);
        }
        if self.window.is_writing() {
            self.window = Window::Idle;
        }

        let mut done = 0;
        if let Window::Reading { pos, end } = &mut self.window {
            let n = (*end - *pos).min(dest.len());
            dest[..n].copy_from_slice(&self.buf[*pos..*pos + n]);
            *pos += n;
            done = n;
        }

        // Keep one byte of the request out of the direct segment. When a
        // single read straddles both segments the overflow byte is moved
        // into that slot, which guarantees the buffer gets filled.
        let slack = usize::from(self.is_buffered());
        let buffer_end = self.buffer_end();

        while done < dest.len() {
            let direct = dest.len() - done - slack;
            let result = {
                let backend = self.backend.as_deref_mut().ok_or(StreamError::Closed)?;
                let (into_dest, _) = dest[done..].split_at_mut(direct);
                let into_buf = &mut self.buf[BUFFER_START..buffer_end];
                backend.readv(&mut [IoSliceMut::new(into_dest), IoSliceMut::new(into_buf)])
            };

            let n = match result {
                Ok(0) => {
                    self.window = Window::Idle;
                    break;
                }
                Ok(n) => n,
                Err(err) => {
                    self.window = Window::Idle;
                    let err = self.record(err);
                    if done > 0 {
                        break;
                    }
                    return Err(err);
                }
            };
            trace!(requested = dest.len() - done, received = n, "backend readv");

            if n > direct {
                let excess = n - direct;
                dest[dest.len() - 1] = self.buf[BUFFER_START];
                self.window = Window::Reading {
                    pos: BUFFER_START + 1,
                    end: BUFFER_START + excess,
                };
                done = dest.len();
            } else {
                done += n;
            }
        }

        Ok(done)
    }

    /// Prefetches input so that at least `count` bytes are buffered, as far
    /// as the buffer and the backend allow.
    ///
    /// Issues at most one backend read into the free space after the read
    /// window; buffered bytes are never moved. This is only a hint: the data
    /// still has to be consumed with [`Stream::read`], and running into end
    /// of input is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing pending writes or the backend read fails.
    pub fn readahead(&mut self, count: usize) -> StreamResult<()> {
        self.ensure_open()?;
        self.flush()?;
        if !self.is_buffered() {
            return Ok(());
        }

        let (pos, end) = match self.window {
            Window::Reading { pos, end } if pos < end => (pos, end),
            _ => (BUFFER_START, BUFFER_START),
        };
        let buffer_end = self.buffer_end();
        if end - pos >= count || end >= buffer_end {
            return Ok(());
        }

        let result = {
            let backend = self.backend.as_deref_mut().ok_or(StreamError::Closed)?;
            backend.readv(&mut [IoSliceMut::new(&mut self.buf[end..buffer_end])])
        };
        match result {
            Ok(n) => {
                trace!(requested = count, received = n, "backend readahead");
                self.window = Window::Reading { pos, end: end + n };
                Ok(())
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Pushes `byte` back so the next read returns it first.
    ///
    /// Up to [`crate::UNGET_SIZE`] bytes can always be pushed back in front
    /// of a fresh buffer; more fit when part of the read window has already
    /// been consumed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::UngetFull`] when there is no room left in
    /// front of the read window, or an error if flushing pending writes
    /// fails.
    pub fn unget(&mut self, byte: u8) -> StreamResult<()> {
        self.ensure_open()?;
        self.flush()?;

        let (pos, end) = match self.window {
            Window::Reading { pos, end } => (pos, end),
            _ => (BUFFER_START, BUFFER_START),
        };
        if pos == 0 {
            return Err(StreamError::UngetFull);
        }

        self.buf[pos - 1] = byte;
        self.window = Window::Reading { pos: pos - 1, end };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StreamConfig, UNGET_SIZE};
    use bufstream_backend::MemoryBackend;
    use bufstream_testkit::{FaultyBackend, FaultHandle, Step};
    use std::io;

    fn reader(data: &[u8], buffer_size: usize) -> (Stream, FaultHandle) {
        let (backend, faults) = FaultyBackend::new(MemoryBackend::with_data(data.to_vec()));
        let stream = Stream::from_backend(
            Box::new(backend),
            StreamConfig::new().buffer_size(buffer_size),
        )
        .unwrap();
        (stream, faults)
    }

    #[test]
    fn empty_read_skips_backend() {
        let (mut stream, faults) = reader(b"data", 16);
        assert_eq!(stream.read(&mut []).unwrap(), 0);
        assert_eq!(faults.calls().total(), 0);
    }

    #[test]
    fn small_read_fills_buffer() {
        let (mut stream, faults) = reader(b"hello world", 64);

        let mut buf = [0u8; 5];
        assert_eq!(stream.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(stream.buffered_read_len(), 6);

        let mut rest = [0u8; 6];
        assert_eq!(stream.read(&mut rest).unwrap(), 6);
        assert_eq!(&rest, b" world");
        assert_eq!(faults.calls().readv, 1);
    }

    #[test]
    fn one_byte_read_goes_through_buffer() {
        let (mut stream, _) = reader(b"xyz", 8);

        let mut byte = [0u8; 1];
        assert_eq!(stream.read(&mut byte).unwrap(), 1);
        assert_eq!(byte[0], b'x');
        assert_eq!(stream.buffered_read_len(), 2);
    }

    #[test]
    fn large_read_bypasses_buffer() {
        let data: Vec<u8> = (0..200u8).collect();
        let (mut stream, faults) = reader(&data, 16);

        let mut buf = vec![0u8; 150];
        assert_eq!(stream.read(&mut buf).unwrap(), 150);
        assert_eq!(buf, &data[..150]);
        // The request and the buffer were filled by a single call.
        assert_eq!(faults.calls().readv, 1);
        // One buffered byte went into the last slot of the request.
        assert_eq!(stream.buffered_read_len(), 15);
    }

    #[test]
    fn read_to_end_returns_partial_count() {
        let (mut stream, _) = reader(b"short", 4);

        let mut buf = [0u8; 32];
        assert_eq!(stream.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"short");
        assert!(stream.last_error().is_none());

        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn short_backend_reads_are_retried() {
        let (mut stream, faults) = reader(b"abcdefghij", 4);
        faults.cap_reads(1);

        let mut buf = [0u8; 10];
        assert_eq!(stream.read(&mut buf).unwrap(), 10);
        assert_eq!(&buf, b"abcdefghij");
    }

    #[test]
    fn unbuffered_reads_directly() {
        let (mut stream, faults) = reader(b"abcdef", 0);

        let mut buf = [0u8; 3];
        assert_eq!(stream.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
        assert_eq!(stream.buffered_read_len(), 0);

        assert_eq!(stream.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"def");
        assert_eq!(faults.calls().readv, 2);
    }

    #[test]
    fn failure_before_any_byte_is_an_error() {
        let (mut stream, faults) = reader(b"abc", 8);
        faults.push_read(Step::Fail(io::ErrorKind::BrokenPipe));

        let mut buf = [0u8; 3];
        assert!(matches!(stream.read(&mut buf), Err(StreamError::Io(_))));
        assert_eq!(stream.last_error().unwrap().kind, io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn failure_after_some_bytes_is_partial_success() {
        let (mut stream, faults) = reader(b"abcdef", 0);
        faults
            .push_read(Step::Limit(2))
            .push_read(Step::Fail(io::ErrorKind::TimedOut));

        let mut buf = [0u8; 6];
        assert_eq!(stream.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(stream.last_error().unwrap().kind, io::ErrorKind::TimedOut);

        // The next call starts with a clean error slot.
        assert_eq!(stream.read(&mut buf).unwrap(), 4);
        assert!(stream.last_error().is_none());
    }

    #[test]
    fn read_flushes_pending_writes() {
        let backend = MemoryBackend::new();
        let mut stream = Stream::memory(backend.reopen(), StreamConfig::default()).unwrap();
        stream.write(b"abc").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
        assert_eq!(backend.data(), b"abc");
        assert_eq!(stream.pending_write_len(), 0);
    }

    #[test]
    fn readahead_extends_window() {
        let (mut stream, faults) = reader(b"0123456789", 8);
        faults.push_read(Step::Limit(3));

        let mut byte = [0u8; 1];
        stream.read(&mut byte).unwrap();
        assert_eq!(stream.buffered_read_len(), 2);

        stream.readahead(5).unwrap();
        assert_eq!(stream.buffered_read_len(), 7);

        let mut buf = [0u8; 7];
        assert_eq!(stream.read(&mut buf).unwrap(), 7);
        assert_eq!(&buf, b"1234567");
        assert_eq!(faults.calls().readv, 2);
    }

    #[test]
    fn readahead_is_noop_when_covered_or_unbuffered() {
        let (mut stream, faults) = reader(b"0123456789", 8);
        stream.readahead(4).unwrap();
        assert_eq!(stream.buffered_read_len(), 8);
        stream.readahead(4).unwrap();
        assert_eq!(faults.calls().readv, 1);

        let (mut unbuffered, faults) = reader(b"0123456789", 0);
        unbuffered.readahead(4).unwrap();
        assert_eq!(faults.calls().total(), 0);
    }

    #[test]
    fn readahead_refills_consumed_window() {
        let (mut stream, faults) = reader(b"0123456789abcdef", 8);
        let mut buf = [0u8; 8];
        stream.read(&mut buf[..1]).unwrap();
        stream.read(&mut buf[..7]).unwrap();
        assert_eq!(stream.buffered_read_len(), 0);

        stream.readahead(4).unwrap();
        assert_eq!(stream.buffered_read_len(), 8);
        assert_eq!(stream.read(&mut buf).unwrap(), 8);
        assert_eq!(&buf, b"89abcdef");
        assert_eq!(faults.calls().readv, 2);
    }

    #[test]
    fn readahead_at_end_of_input_is_ok() {
        let (mut stream, _) = reader(b"", 8);
        stream.readahead(4).unwrap();
        assert_eq!(stream.buffered_read_len(), 0);
    }

    #[test]
    fn unget_returns_bytes_in_lifo_order() {
        let (mut stream, _) = reader(b"cd", 8);
        stream.unget(b'b').unwrap();
        stream.unget(b'a').unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn unget_prefix_is_bounded() {
        let (mut stream, _) = reader(b"", 0);
        for byte in 0..UNGET_SIZE {
            stream.unget(byte as u8).unwrap();
        }
        assert!(matches!(stream.unget(0xff), Err(StreamError::UngetFull)));

        let mut buf = [0u8; UNGET_SIZE];
        assert_eq!(stream.read(&mut buf).unwrap(), UNGET_SIZE);
        assert_eq!(buf, [7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn unget_reuses_consumed_window_space() {
        let (mut stream, _) = reader(b"hello", 16);
        let mut buf = [0u8; 3];
        stream.read(&mut buf).unwrap();

        stream.unget(b'L').unwrap();
        let mut rest = [0u8; 3];
        assert_eq!(stream.read(&mut rest).unwrap(), 3);
        assert_eq!(&rest, b"Llo");
    }
}
