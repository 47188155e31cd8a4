//! # bufstream backend
//!
//! Unbuffered I/O backends for bufstream.
//!
//! This crate provides the lowest-level I/O abstraction underneath a
//! buffered stream. Backends are **raw byte channels** - they move bytes
//! exactly as asked and never buffer on their own.
//!
//! ## Design Principles
//!
//! - Four operations: close, vectored read, vectored write, seek
//! - Short reads and short writes are normal results, not errors
//! - Failures carry an [`ErrorCode`] that the stream layer keeps around
//! - Must be `Send` so a stream can move between threads
//!
//! ## Available Backends
//!
//! - [`FdBackend`] - OS file descriptors
//! - [`MemoryBackend`] - Shared in-memory bytes, for tests and string streams
//!
//! ## Example
//!
//! ```rust
//! use bufstream_backend::{Backend, MemoryBackend};
//! use std::io::{IoSlice, IoSliceMut, SeekFrom};
//!
//! let mut backend = MemoryBackend::new();
//! backend.writev(&[IoSlice::new(b"hello "), IoSlice::new(b"world")]).unwrap();
//! backend.seek(SeekFrom::Start(6)).unwrap();
//!
//! let mut buf = [0u8; 5];
//! backend.readv(&mut [IoSliceMut::new(&mut buf)]).unwrap();
//! assert_eq!(&buf, b"world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod fd;
mod memory;

pub use backend::Backend;
pub use error::{BackendError, BackendResult, ErrorCode};
pub use fd::FdBackend;
pub use memory::MemoryBackend;
