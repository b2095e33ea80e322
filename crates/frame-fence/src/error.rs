//! Error types for frame pacing.

use thiserror::Error;

/// Boxed error reported by a [`CompletionTimeline`](crate::CompletionTimeline).
pub type TimelineSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Frame pacing error.
///
/// Every variant is fatal to the render loop: a failed signal or wait means
/// the device or the OS can no longer be trusted to report progress.
#[derive(Error, Debug)]
pub enum FenceError {
    /// A slot index outside `[0, slot_count)` was used.
    #[error("frame slot {slot} is out of range for {slot_count} slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },

    /// Enqueueing a completion signal failed.
    #[error("failed to signal completion value {value}")]
    Signal {
        value: u64,
        #[source]
        source: TimelineSource,
    },

    /// Blocking on a completion value failed.
    #[error("failed to wait for completion value {value}")]
    Wait {
        value: u64,
        #[source]
        source: TimelineSource,
    },

    /// The counter has no value left to signal. A removed D3D12 device
    /// reports `u64::MAX` as its completed value.
    #[error("completion counter exhausted at {last}")]
    CounterExhausted { last: u64 },

    /// The wait primitive returned before the counter reached its target.
    #[error("wait for completion value {value} returned with the counter at {completed}")]
    WaitIncomplete { value: u64, completed: u64 },
}

/// Result type alias for frame pacing operations.
pub type FenceResult<T> = std::result::Result<T, FenceError>;
