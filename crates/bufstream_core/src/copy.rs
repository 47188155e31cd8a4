//! Stream-to-stream copying.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{StreamError, StreamResult};
use crate::stream::Stream;
use serde::Serialize;
use tracing::debug;

/// Byte counts reported by [`copy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    /// Bytes read from the source.
    pub read: u64,
    /// Bytes accepted by the destination.
    pub written: u64,
}

impl CopyStats {
    /// Returns `true` if every byte read was also written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.read == self.written
    }
}

/// Copies bytes from `src` to `dest` until end of input, or until `limit`
/// bytes have been read.
///
/// Data moves in chunks as large as the larger of the two buffers. Copying
/// stops early at the first short write; `written < read` in the result
/// tells that apart from a clean finish, and `dest.last_error()` says why.
/// `dest` is not flushed.
///
/// ```rust
/// use bufstream_core::{copy, MemoryBackend, Stream, StreamConfig};
///
/// let mut src = Stream::memory(MemoryBackend::with_data(b"payload".to_vec()), StreamConfig::default()).unwrap();
/// let out = MemoryBackend::new();
/// let mut dest = Stream::memory(out.reopen(), StreamConfig::default()).unwrap();
///
/// let stats = copy(&mut src, &mut dest, Some(3)).unwrap();
/// assert_eq!(stats.written, 3);
/// dest.flush().unwrap();
/// assert_eq!(out.data(), b"pay");
/// ```
///
/// # Errors
///
/// Returns an error if reading or writing fails before anything was
/// copied. A failure after that ends the copy with the counts so far.
pub fn copy(src: &mut Stream, dest: &mut Stream, limit: Option<u64>) -> StreamResult<CopyStats> {
    let chunk = match src.buffer_size().max(dest.buffer_size()) {
        0 => DEFAULT_BUFFER_SIZE,
        n => n,
    };
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(chunk)
        .map_err(|_| StreamError::OutOfMemory { requested: chunk })?;
    scratch.resize(chunk, 0);

    let mut stats = CopyStats::default();
    loop {
        let want = match limit {
            Some(limit) => {
                let left = limit - stats.read;
                if left == 0 {
                    break;
                }
                usize::try_from(left).map_or(chunk, |left| left.min(chunk))
            }
            None => chunk,
        };

        let n = match src.read(&mut scratch[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if stats.read == 0 => return Err(err),
            Err(_) => break,
        };
        stats.read += n as u64;

        let written = match dest.write(&scratch[..n]) {
            Ok(w) => w,
            Err(err) if stats.written == 0 => return Err(err),
            Err(_) => 0,
        };
        stats.written += written as u64;
        if written < n {
            break;
        }
    }

    debug!(read = stats.read, written = stats.written, "stream copy finished");
    Ok(stats)
}

impl Stream {
    /// Copies from this stream into `dest`; see [`copy`].
    ///
    /// # Errors
    ///
    /// Same as [`copy`].
    pub fn copy_to(&mut self, dest: &mut Stream, limit: Option<u64>) -> StreamResult<CopyStats> {
        copy(self, dest, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamConfig;
    use bufstream_backend::MemoryBackend;
    use bufstream_testkit::{repeated, FaultyBackend, Step};
    use std::io;

    fn source(data: Vec<u8>, buffer_size: usize) -> Stream {
        Stream::memory(
            MemoryBackend::with_data(data),
            StreamConfig::new().buffer_size(buffer_size),
        )
        .unwrap()
    }

    #[test]
    fn copies_to_end_of_input() {
        let data = repeated(b"0123456789", 100);
        let mut src = source(data.clone(), 64);
        let out = MemoryBackend::new();
        let mut dest = Stream::memory(out.reopen(), StreamConfig::new().buffer_size(16)).unwrap();

        let stats = copy(&mut src, &mut dest, None).unwrap();
        assert_eq!(stats, CopyStats { read: 1000, written: 1000 });
        assert!(stats.is_complete());
        dest.close().unwrap();
        assert_eq!(out.data(), data);
    }

    #[test]
    fn limit_stops_early() {
        let mut src = source(b"abcdefghij".to_vec(), 4);
        let out = MemoryBackend::new();
        let mut dest = Stream::memory(out.reopen(), StreamConfig::default()).unwrap();

        let stats = src.copy_to(&mut dest, Some(6)).unwrap();
        assert_eq!(stats.read, 6);
        dest.flush().unwrap();
        assert_eq!(out.data(), b"abcdef");

        let mut rest = [0u8; 8];
        let n = src.read(&mut rest).unwrap();
        assert_eq!(&rest[..n], b"ghij");
    }

    #[test]
    fn zero_limit_copies_nothing() {
        let mut src = source(b"abc".to_vec(), 4);
        let mut dest = Stream::memory(MemoryBackend::new(), StreamConfig::default()).unwrap();
        assert_eq!(copy(&mut src, &mut dest, Some(0)).unwrap(), CopyStats::default());
    }

    #[test]
    fn unbuffered_streams_still_copy() {
        let mut src = source(b"unbuffered".to_vec(), 0);
        let out = MemoryBackend::new();
        let mut dest = Stream::memory(out.reopen(), StreamConfig::unbuffered()).unwrap();

        let stats = copy(&mut src, &mut dest, None).unwrap();
        assert_eq!(stats.written, 10);
        assert_eq!(out.data(), b"unbuffered");
    }

    #[test]
    fn short_write_ends_copy() {
        let mut src = source(repeated(b"x", 100), 0);
        let (backend, faults) = FaultyBackend::new(MemoryBackend::new());
        let mut dest = Stream::from_backend(Box::new(backend), StreamConfig::unbuffered()).unwrap();
        faults
            .push_write(Step::Limit(40))
            .push_write(Step::Fail(io::ErrorKind::StorageFull));

        let stats = copy(&mut src, &mut dest, None).unwrap();
        assert_eq!(stats, CopyStats { read: 100, written: 40 });
        assert!(!stats.is_complete());
        assert_eq!(dest.last_error().unwrap().kind, io::ErrorKind::StorageFull);
    }

    #[test]
    fn failure_before_progress_is_an_error() {
        let (backend, faults) = FaultyBackend::new(MemoryBackend::with_data(b"abc".to_vec()));
        let mut src = Stream::from_backend(Box::new(backend), StreamConfig::default()).unwrap();
        let mut dest = Stream::memory(MemoryBackend::new(), StreamConfig::default()).unwrap();
        faults.push_read(Step::Fail(io::ErrorKind::Other));

        assert!(copy(&mut src, &mut dest, None).is_err());
    }
}
