//! Buffer window state.

/// Which part of the stream buffer currently holds live data.
///
/// All offsets index the stream's buffer vector, whose first
/// [`crate::UNGET_SIZE`] bytes are the unget prefix. A stream is never
/// reading and writing at the same time, so the two windows share one enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Window {
    /// No buffered data in either direction.
    #[default]
    Idle,
    /// Bytes `[pos, end)` were fetched from the backend but not yet
    /// delivered.
    Reading {
        /// Next byte to deliver.
        pos: usize,
        /// One past the last fetched byte.
        end: usize,
    },
    /// Bytes `[base, pos)` were accepted but not yet flushed; `end` is the
    /// write capacity limit.
    Writing {
        /// First unflushed byte.
        base: usize,
        /// Next write position.
        pos: usize,
        /// Capacity limit.
        end: usize,
    },
}

impl Window {
    /// Bytes buffered for reading and not yet delivered.
    pub(crate) fn unread(&self) -> usize {
        match *self {
            Self::Reading { pos, end } => end - pos,
            _ => 0,
        }
    }

    /// Bytes buffered for writing and not yet flushed.
    pub(crate) fn pending(&self) -> usize {
        match *self {
            Self::Writing { base, pos, .. } => pos - base,
            _ => 0,
        }
    }

    pub(crate) fn is_writing(&self) -> bool {
        matches!(self, Self::Writing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_nothing_buffered() {
        let window = Window::default();
        assert_eq!(window.unread(), 0);
        assert_eq!(window.pending(), 0);
        assert!(!window.is_writing());
    }

    #[test]
    fn counts_follow_the_active_direction() {
        let reading = Window::Reading { pos: 10, end: 14 };
        assert_eq!(reading.unread(), 4);
        assert_eq!(reading.pending(), 0);

        let writing = Window::Writing {
            base: 8,
            pos: 11,
            end: 40,
        };
        assert_eq!(writing.unread(), 0);
        assert_eq!(writing.pending(), 3);
        assert!(writing.is_writing());
    }
}
