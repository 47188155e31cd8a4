//! # bufstream testkit
//!
//! Test utilities for bufstream.
//!
//! This crate provides:
//! - A fault-injecting backend wrapper for short transfers and failures
//! - Temporary file fixtures
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use bufstream_backend::MemoryBackend;
//! use bufstream_testkit::prelude::*;
//!
//! let (backend, faults) = FaultyBackend::new(MemoryBackend::new());
//! faults.cap_writes(1);
//! # drop(backend);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
