//! `std::io` trait implementations.
//!
//! Lets a [`Stream`] plug into `io::copy`, `BufReader`-free parsers and the
//! `write!` macro. Errors are converted with `From<StreamError>`.

use crate::stream::Stream;
use std::io::{self, IoSlice, Read, Seek, SeekFrom, Write};

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(Stream::read(self, buf)?)
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Stream::write(self, buf)?)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        Ok(Stream::writev(self, bufs)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(Stream::flush(self)?)
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(Stream::seek(self, pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(Stream::tell(self)?)
    }
}
