//! Fault-injecting backend wrapper.
//!
//! Wraps any [`Backend`] and lets a test script short transfers and
//! failures call by call, even after the backend has been handed to a
//! stream. The script and the call counters live behind a shared
//! [`FaultHandle`].

use bufstream_backend::{Backend, BackendError, BackendResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, IoSlice, IoSliceMut, SeekFrom};
use std::sync::Arc;

/// What the next scripted call should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Pass the call through unchanged (subject to the default cap).
    Pass,
    /// Pass the call through, but transfer at most this many bytes.
    Limit(usize),
    /// Fail without touching the inner backend.
    Fail(io::ErrorKind),
}

/// Number of calls that reached the wrapper, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `readv` calls.
    pub readv: usize,
    /// `writev` calls.
    pub writev: usize,
    /// `seek` calls.
    pub seek: usize,
    /// `close` calls.
    pub close: usize,
}

impl CallCounts {
    /// Total number of backend calls.
    #[must_use]
    pub fn total(&self) -> usize {
        self.readv + self.writev + self.seek + self.close
    }
}

#[derive(Debug, Default)]
struct FaultState {
    calls: CallCounts,
    reads: VecDeque<Step>,
    writes: VecDeque<Step>,
    seeks: VecDeque<Step>,
    closes: VecDeque<Step>,
    max_read: Option<usize>,
    max_write: Option<usize>,
    seek_log: Vec<SeekFrom>,
}

impl FaultState {
    fn next(queue: &mut VecDeque<Step>, cap: Option<usize>) -> Step {
        match queue.pop_front() {
            Some(step) => step,
            None => cap.map_or(Step::Pass, Step::Limit),
        }
    }
}

/// Shared control over a [`FaultyBackend`].
#[derive(Debug, Clone, Default)]
pub struct FaultHandle {
    state: Arc<Mutex<FaultState>>,
}

impl FaultHandle {
    /// Queues the behaviour of an upcoming `readv` call.
    pub fn push_read(&self, step: Step) -> &Self {
        self.state.lock().reads.push_back(step);
        self
    }

    /// Queues the behaviour of an upcoming `writev` call.
    pub fn push_write(&self, step: Step) -> &Self {
        self.state.lock().writes.push_back(step);
        self
    }

    /// Queues the behaviour of an upcoming `seek` call.
    pub fn push_seek(&self, step: Step) -> &Self {
        self.state.lock().seeks.push_back(step);
        self
    }

    /// Queues the behaviour of an upcoming `close` call.
    pub fn push_close(&self, step: Step) -> &Self {
        self.state.lock().closes.push_back(step);
        self
    }

    /// Caps every unscripted `readv` at `max` bytes.
    pub fn cap_reads(&self, max: usize) -> &Self {
        self.state.lock().max_read = Some(max);
        self
    }

    /// Caps every unscripted `writev` at `max` bytes.
    pub fn cap_writes(&self, max: usize) -> &Self {
        self.state.lock().max_write = Some(max);
        self
    }

    /// Returns the calls seen so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    /// Returns every seek request seen so far, in order.
    #[must_use]
    pub fn seeks(&self) -> Vec<SeekFrom> {
        self.state.lock().seek_log.clone()
    }
}

/// A backend wrapper that injects short transfers and failures.
///
/// # Example
///
/// ```rust
/// use bufstream_backend::{Backend, MemoryBackend};
/// use bufstream_testkit::{FaultyBackend, Step};
/// use std::io::{ErrorKind, IoSlice};
///
/// let (mut backend, faults) = FaultyBackend::new(MemoryBackend::new());
/// faults.push_write(Step::Limit(2)).push_write(Step::Fail(ErrorKind::Other));
///
/// assert_eq!(backend.writev(&[IoSlice::new(b"abcd")]).unwrap(), 2);
/// assert!(backend.writev(&[IoSlice::new(b"cd")]).is_err());
/// assert_eq!(faults.calls().writev, 2);
/// ```
#[derive(Debug)]
pub struct FaultyBackend<B> {
    inner: B,
    handle: FaultHandle,
}

impl<B: Backend> FaultyBackend<B> {
    /// Wraps `inner`, returning the wrapper and its control handle.
    pub fn new(inner: B) -> (Self, FaultHandle) {
        let handle = FaultHandle::default();
        (
            Self {
                inner,
                handle: handle.clone(),
            },
            handle,
        )
    }

    /// Returns the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn injected(kind: io::ErrorKind) -> BackendError {
    BackendError::Io(io::Error::new(kind, "injected fault"))
}

impl<B: Backend> Backend for FaultyBackend<B> {
    fn close(&mut self) -> BackendResult<()> {
        let step = {
            let mut state = self.handle.state.lock();
            state.calls.close += 1;
            FaultState::next(&mut state.closes, None)
        };
        match step {
            Step::Fail(kind) => Err(injected(kind)),
            Step::Pass | Step::Limit(_) => self.inner.close(),
        }
    }

    fn readv(&mut self, bufs: &mut [IoSliceMut<'_>]) -> BackendResult<usize> {
        let step = {
            let mut state = self.handle.state.lock();
            state.calls.readv += 1;
            let cap = state.max_read;
            FaultState::next(&mut state.reads, cap)
        };
        match step {
            Step::Fail(kind) => Err(injected(kind)),
            Step::Pass => self.inner.readv(bufs),
            Step::Limit(max) => {
                let mut budget = max;
                let mut limited: Vec<IoSliceMut<'_>> = Vec::with_capacity(bufs.len());
                for buf in bufs.iter_mut() {
                    let take = buf.len().min(budget);
                    limited.push(IoSliceMut::new(&mut buf[..take]));
                    budget -= take;
                }
                self.inner.readv(&mut limited)
            }
        }
    }

    fn writev(&mut self, bufs: &[IoSlice<'_>]) -> BackendResult<usize> {
        let step = {
            let mut state = self.handle.state.lock();
            state.calls.writev += 1;
            let cap = state.max_write;
            FaultState::next(&mut state.writes, cap)
        };
        match step {
            Step::Fail(kind) => Err(injected(kind)),
            Step::Pass => self.inner.writev(bufs),
            Step::Limit(max) => {
                let mut budget = max;
                let mut limited = Vec::with_capacity(bufs.len());
                for buf in bufs {
                    let take = buf.len().min(budget);
                    limited.push(IoSlice::new(&buf[..take]));
                    budget -= take;
                }
                self.inner.writev(&limited)
            }
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> BackendResult<u64> {
        let step = {
            let mut state = self.handle.state.lock();
            state.calls.seek += 1;
            state.seek_log.push(pos);
            FaultState::next(&mut state.seeks, None)
        };
        match step {
            Step::Fail(kind) => Err(injected(kind)),
            Step::Pass | Step::Limit(_) => self.inner.seek(pos),
        }
    }
}
