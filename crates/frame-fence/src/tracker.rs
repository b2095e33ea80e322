//! The frame fence tracker.
//!
//! # Synchronization Flow
//!
//! ```text
//! 1. Record commands into the resources of the current slot
//! 2. Execute them on the queue and present
//! 3. submit_and_advance(slot)   -> signal value V, expected[slot] = V
//! 4. acquire_next_slot(surface) -> slot = surface.current_slot()
//!                                  wait until completed >= expected[slot]
//! 5. Back to 1 with the returned slot
//! ```
//!
//! All slots share one counter. Every submission takes the next counter
//! value, so a slot's expected value grows each time it is reused and the
//! producer can run at most `N - 1` frames ahead of the consumer.

use tracing::{debug, trace};

use crate::error::{FenceError, FenceResult};
use crate::timeline::{CompletionTimeline, PresentationSurface};
use crate::FRAME_COUNT;

/// Guards reuse of `N` frame slots against a [`CompletionTimeline`].
///
/// The tracker is not thread-safe and is meant to be owned by the render
/// loop. It owns the timeline so that no other code can signal values out of
/// order.
#[derive(Debug)]
pub struct FrameFenceTracker<T, const N: usize = FRAME_COUNT> {
    timeline: T,
    /// Counter value each slot must reach before its resources are rewritten.
    expected: [u64; N],
    /// Highest value enqueued on the timeline.
    last_signaled: u64,
    current: usize,
}

impl<T: CompletionTimeline, const N: usize> FrameFenceTracker<T, N> {
    /// Creates a tracker positioned at `initial_slot`.
    ///
    /// The counter's starting point is whatever the timeline already reports
    /// as completed; no slot has outstanding work yet.
    pub fn new(timeline: T, initial_slot: usize) -> FenceResult<Self> {
        check_slot::<N>(initial_slot)?;
        let last_signaled = timeline.completed_value();
        debug!(
            slot_count = N,
            initial_slot, last_signaled, "created frame fence tracker"
        );
        Ok(Self {
            timeline,
            expected: [last_signaled; N],
            last_signaled,
            current: initial_slot,
        })
    }

    /// Records that work targeting `slot` has just been enqueued.
    ///
    /// Signals a freshly incremented counter value on the timeline and makes
    /// it the value `slot` must reach before reuse. Does not block.
    pub fn submit_and_advance(&mut self, slot: usize) -> FenceResult<u64> {
        check_slot::<N>(slot)?;
        let value = self
            .last_signaled
            .checked_add(1)
            .ok_or(FenceError::CounterExhausted {
                last: self.last_signaled,
            })?;
        self.timeline
            .signal(value)
            .map_err(|source| FenceError::Signal {
                value,
                source: Box::new(source),
            })?;

        debug_assert!(value > self.expected[slot]);
        self.last_signaled = value;
        self.expected[slot] = value;
        trace!(slot, value, "submitted frame");
        Ok(value)
    }

    /// Moves to the slot the presentation surface reports as current.
    ///
    /// Blocks while the GPU has not yet finished the last work submitted for
    /// that slot. Returns the slot index, whose resources are then safe to
    /// write.
    pub fn acquire_next_slot<S>(&mut self, surface: &S) -> FenceResult<usize>
    where
        S: PresentationSurface + ?Sized,
    {
        let slot = surface.current_slot();
        check_slot::<N>(slot)?;
        let target = self.expected[slot];
        self.wait_for_value(target)?;
        self.current = slot;
        Ok(slot)
    }

    /// Blocks until every submission on every slot has completed.
    ///
    /// Returns immediately when nothing is outstanding.
    pub fn wait_for_idle(&mut self) -> FenceResult<()> {
        let target = self.last_signaled;
        debug!(target, "waiting for gpu idle");
        self.wait_for_value(target)
    }

    fn wait_for_value(&mut self, target: u64) -> FenceResult<()> {
        if self.timeline.completed_value() >= target {
            return Ok(());
        }
        trace!(target, "blocking on completion counter");
        self.timeline
            .wait_until(target)
            .map_err(|source| FenceError::Wait {
                value: target,
                source: Box::new(source),
            })?;

        let completed = self.timeline.completed_value();
        if completed < target {
            return Err(FenceError::WaitIncomplete {
                value: target,
                completed,
            });
        }
        Ok(())
    }

    /// Counter value `slot` must reach before reuse.
    pub fn expected_completion(&self, slot: usize) -> FenceResult<u64> {
        check_slot::<N>(slot)?;
        Ok(self.expected[slot])
    }

    pub fn last_signaled(&self) -> u64 {
        self.last_signaled
    }

    pub fn completed_value(&self) -> u64 {
        self.timeline.completed_value()
    }

    /// Slot returned by the last acquire, or the initial slot.
    pub fn current_slot(&self) -> usize {
        self.current
    }

    #[inline]
    pub const fn slot_count(&self) -> usize {
        N
    }

    pub fn timeline(&self) -> &T {
        &self.timeline
    }
}

fn check_slot<const N: usize>(slot: usize) -> FenceResult<()> {
    if slot < N {
        Ok(())
    } else {
        Err(FenceError::SlotOutOfRange {
            slot,
            slot_count: N,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::thread;

    use super::*;
    use crate::host_timeline::HostTimeline;
    use crate::surface::RoundRobinSurface;

    #[derive(Debug)]
    struct DeviceRemoved;

    impl fmt::Display for DeviceRemoved {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("device removed")
        }
    }

    impl std::error::Error for DeviceRemoved {}

    /// Timeline whose primitives fail on demand.
    #[derive(Default)]
    struct FlakyTimeline {
        completed: u64,
        fail_signal: bool,
        fail_wait: bool,
        wait_returns_early: bool,
    }

    impl CompletionTimeline for FlakyTimeline {
        type Error = DeviceRemoved;

        fn signal(&mut self, _value: u64) -> Result<(), Self::Error> {
            if self.fail_signal { Err(DeviceRemoved) } else { Ok(()) }
        }

        fn completed_value(&self) -> u64 {
            self.completed
        }

        fn wait_until(&mut self, value: u64) -> Result<(), Self::Error> {
            if self.fail_wait {
                return Err(DeviceRemoved);
            }
            if !self.wait_returns_early {
                self.completed = value;
            }
            Ok(())
        }
    }

    #[test]
    fn test_submit_assigns_increasing_values() {
        let mut tracker = FrameFenceTracker::<_, 2>::new(HostTimeline::new(), 0).unwrap();
        assert_eq!(tracker.submit_and_advance(0).unwrap(), 1);
        assert_eq!(tracker.submit_and_advance(1).unwrap(), 2);
        assert_eq!(tracker.expected_completion(0).unwrap(), 1);
        assert_eq!(tracker.expected_completion(1).unwrap(), 2);
        assert_eq!(tracker.timeline().signaled_value(), 2);
        assert_eq!(tracker.last_signaled(), 2);
    }

    #[test]
    fn test_counter_starts_at_completed_value() {
        let timeline = HostTimeline::new();
        timeline.complete(41);
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 1).unwrap();
        assert_eq!(tracker.expected_completion(0).unwrap(), 41);
        assert_eq!(tracker.submit_and_advance(1).unwrap(), 42);
    }

    #[test]
    fn test_exhausted_counter_is_an_error() {
        let timeline = HostTimeline::new();
        timeline.complete(u64::MAX);
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline.clone(), 0).unwrap();
        assert!(matches!(
            tracker.submit_and_advance(0),
            Err(FenceError::CounterExhausted { last: u64::MAX })
        ));
        assert_eq!(tracker.expected_completion(0).unwrap(), u64::MAX);
        assert_eq!(tracker.last_signaled(), u64::MAX);
        assert_eq!(timeline.signaled_value(), 0);
    }

    #[test]
    fn test_initial_slot_must_be_in_range() {
        let result = FrameFenceTracker::<_, 2>::new(HostTimeline::new(), 2);
        assert!(matches!(
            result,
            Err(FenceError::SlotOutOfRange {
                slot: 2,
                slot_count: 2
            })
        ));
    }

    #[test]
    fn test_acquire_does_not_block_when_slot_is_free() {
        let mut tracker = FrameFenceTracker::<_, 2>::new(HostTimeline::new(), 0).unwrap();
        let mut surface = RoundRobinSurface::<2>::new(0);

        tracker.submit_and_advance(0).unwrap();
        surface.present();
        // Slot 1 has never been submitted, so nothing to wait for.
        assert_eq!(tracker.acquire_next_slot(&surface).unwrap(), 1);
        assert_eq!(tracker.current_slot(), 1);
    }

    #[test]
    fn test_acquire_blocks_until_slot_completes() {
        let timeline = HostTimeline::new();
        let gpu = timeline.clone();
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 0).unwrap();
        let mut surface = RoundRobinSurface::<2>::new(0);

        tracker.submit_and_advance(0).unwrap();
        surface.present();
        tracker.submit_and_advance(1).unwrap();
        surface.present();

        let producer = thread::spawn(move || {
            let slot = tracker.acquire_next_slot(&surface);
            (slot, tracker)
        });
        while gpu.waiter_count() == 0 {
            thread::yield_now();
        }
        assert!(!producer.is_finished());

        gpu.complete(1);
        let (slot, tracker) = producer.join().unwrap();
        assert_eq!(slot.unwrap(), 0);
        assert!(tracker.completed_value() >= tracker.expected_completion(0).unwrap());
    }

    #[test]
    fn test_wait_for_idle_without_submissions_returns_immediately() {
        let timeline = HostTimeline::new();
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline.clone(), 0).unwrap();
        tracker.wait_for_idle().unwrap();
        assert_eq!(timeline.signaled_value(), 0);
    }

    #[test]
    fn test_wait_for_idle_covers_all_slots() {
        let timeline = HostTimeline::new();
        let gpu = timeline.clone();
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 0).unwrap();
        tracker.submit_and_advance(0).unwrap();
        tracker.submit_and_advance(1).unwrap();

        let consumer = thread::spawn(move || {
            while gpu.waiter_count() == 0 {
                thread::yield_now();
            }
            gpu.complete(1);
            gpu.complete(2);
        });
        tracker.wait_for_idle().unwrap();
        consumer.join().unwrap();

        let max_expected = (0..2)
            .map(|slot| tracker.expected_completion(slot).unwrap())
            .max()
            .unwrap();
        assert!(tracker.completed_value() >= max_expected);
    }

    #[test]
    fn test_failed_signal_leaves_expected_unchanged() {
        let timeline = FlakyTimeline {
            fail_signal: true,
            ..Default::default()
        };
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 0).unwrap();
        let err = tracker.submit_and_advance(0).unwrap_err();
        assert!(matches!(err, FenceError::Signal { value: 1, .. }));
        assert_eq!(tracker.expected_completion(0).unwrap(), 0);
        assert_eq!(tracker.last_signaled(), 0);
    }

    #[test]
    fn test_failed_wait_is_reported() {
        let timeline = FlakyTimeline {
            fail_wait: true,
            ..Default::default()
        };
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 0).unwrap();
        tracker.submit_and_advance(0).unwrap();
        let err = tracker.acquire_next_slot(&RoundRobinSurface::<2>::new(0)).unwrap_err();
        assert!(matches!(err, FenceError::Wait { value: 1, .. }));
        assert_eq!(err.to_string(), "failed to wait for completion value 1");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("device removed".to_string())
        );
    }

    #[test]
    fn test_wait_that_returns_early_is_an_error() {
        let timeline = FlakyTimeline {
            wait_returns_early: true,
            ..Default::default()
        };
        let mut tracker = FrameFenceTracker::<_, 2>::new(timeline, 0).unwrap();
        tracker.submit_and_advance(0).unwrap();
        assert!(matches!(
            tracker.wait_for_idle(),
            Err(FenceError::WaitIncomplete {
                value: 1,
                completed: 0
            })
        ));
    }

    #[test]
    fn test_surface_index_out_of_range() {
        let mut tracker = FrameFenceTracker::<_, 2>::new(HostTimeline::new(), 0).unwrap();
        let surface = RoundRobinSurface::<3>::new(2);
        assert!(matches!(
            tracker.acquire_next_slot(&surface),
            Err(FenceError::SlotOutOfRange { slot: 2, .. })
        ));
    }
}
