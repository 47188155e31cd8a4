//! Stream configuration.

/// Default buffer capacity, matching the classic `BUFSIZ`.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Bytes reserved in front of the buffer for pushed-back input.
pub const UNGET_SIZE: usize = 8;

/// Configuration for opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Capacity of the stream buffer in bytes. Zero disables buffering and
    /// every operation goes straight to the backend.
    pub buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl StreamConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for an unbuffered stream.
    #[must_use]
    pub const fn unbuffered() -> Self {
        Self { buffer_size: 0 }
    }

    /// Sets the buffer capacity.
    #[must_use]
    pub const fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Returns `true` if this configuration buffers I/O.
    #[must_use]
    pub const fn is_buffered(&self) -> bool {
        self.buffer_size > 0
    }
}
