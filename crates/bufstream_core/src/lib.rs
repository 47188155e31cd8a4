//! # bufstream core
//!
//! Buffered stream engine for bufstream.
//!
//! This crate provides:
//! - [`Stream`], a buffered stream over any [`Backend`]
//! - One fixed-size buffer per stream with a small unget prefix
//! - Vectored reads that fill the caller's memory and the buffer in one call
//! - Vectored writes that flush buffered bytes and new bytes in one call
//! - Flush/discard rules across read, write and seek transitions
//!
//! ## Example
//!
//! ```rust
//! use bufstream_core::{MemoryBackend, Stream, StreamConfig};
//! use std::io::SeekFrom;
//!
//! let backend = MemoryBackend::new();
//! let mut stream = Stream::memory(backend.reopen(), StreamConfig::default()).unwrap();
//! for _ in 0..100 {
//!     stream.write(b"Hello").unwrap();
//! }
//! stream.seek(SeekFrom::Start(0)).unwrap();
//!
//! let mut buf = [0u8; 1024];
//! assert_eq!(stream.read(&mut buf).unwrap(), 500);
//! stream.close().unwrap();
//! assert_eq!(backend.len(), 500);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod copy;
mod error;
mod io;
mod mode;
mod read;
mod seek;
mod stream;
mod window;
mod write;

pub use config::{StreamConfig, DEFAULT_BUFFER_SIZE, UNGET_SIZE};
pub use copy::{copy, CopyStats};
pub use error::{StreamError, StreamResult};
pub use mode::{parse_mode, OpenFlags};
pub use stream::Stream;

pub use bufstream_backend::{Backend, BackendError, ErrorCode, FdBackend, MemoryBackend};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
