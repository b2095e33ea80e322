//! A completion timeline driven from the CPU.
//!
//! [`HostTimeline`] stands in for a GPU queue and its fence. The producer
//! side (the render loop, through [`FrameFenceTracker`](crate::FrameFenceTracker))
//! signals and waits through [`CompletionTimeline`]; a consumer side, usually
//! another thread holding a clone, calls [`HostTimeline::complete`] to report
//! progress. Blocking waits park on a [`Condvar`], never spin.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::trace;

use crate::timeline::CompletionTimeline;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostTimelineError {
    /// Signals must be strictly increasing.
    #[error("signal value {value} does not exceed the last signaled value {last}")]
    NonMonotonicSignal { value: u64, last: u64 },
}

#[derive(Debug, Default)]
struct State {
    completed: u64,
    signaled: u64,
    waiters: usize,
    immediate: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    progress: Condvar,
}

/// Cloneable handle to a shared host-side completion counter.
#[derive(Debug, Clone, Default)]
pub struct HostTimeline {
    shared: Arc<Shared>,
}

impl HostTimeline {
    /// A timeline whose counter only moves when [`complete`](Self::complete)
    /// or [`complete_pending`](Self::complete_pending) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline that completes every signal as soon as it is enqueued.
    pub fn immediate() -> Self {
        let timeline = Self::default();
        timeline.lock().immediate = true;
        timeline
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances the counter to `value`. Lower values are ignored.
    pub fn complete(&self, value: u64) {
        let mut state = self.lock();
        if value > state.completed {
            trace!(value, "host timeline completed");
            state.completed = value;
            self.shared.progress.notify_all();
        }
    }

    /// Completes everything signaled so far.
    pub fn complete_pending(&self) {
        let signaled = self.signaled_value();
        self.complete(signaled);
    }

    /// Highest value enqueued through [`CompletionTimeline::signal`].
    pub fn signaled_value(&self) -> u64 {
        self.lock().signaled
    }

    /// Number of threads currently blocked in [`CompletionTimeline::wait_until`].
    pub fn waiter_count(&self) -> usize {
        self.lock().waiters
    }
}

impl CompletionTimeline for HostTimeline {
    type Error = HostTimelineError;

    fn signal(&mut self, value: u64) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if value <= state.signaled {
            return Err(HostTimelineError::NonMonotonicSignal {
                value,
                last: state.signaled,
            });
        }
        state.signaled = value;
        if state.immediate && value > state.completed {
            state.completed = value;
            self.shared.progress.notify_all();
        }
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.lock().completed
    }

    fn wait_until(&mut self, value: u64) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.waiters += 1;
        while state.completed < value {
            state = self
                .shared
                .progress
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.waiters -= 1;
        Ok(())
    }
}
