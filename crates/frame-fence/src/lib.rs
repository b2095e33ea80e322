//! Frame pacing for double-buffered rendering.
//!
//! A renderer that keeps more than one frame in flight owns a small, fixed
//! set of per-frame resources (back buffers, command allocators). The CPU
//! may only rewrite a set once the GPU has finished every command that reads
//! it. [`FrameFenceTracker`] enforces that rule against a monotonically
//! increasing completion counter exposed through [`CompletionTimeline`].
//!
//! The crate has no graphics-API dependency. A Direct3D 12 renderer
//! implements the two traits on top of a command queue, an `ID3D12Fence` and
//! a swap chain; tests and headless runs use [`HostTimeline`] and
//! [`RoundRobinSurface`].

pub mod error;
pub mod host_timeline;
pub mod slots;
pub mod surface;
pub mod timeline;
pub mod tracker;

pub use error::{FenceError, FenceResult};
pub use host_timeline::{HostTimeline, HostTimelineError};
pub use slots::FrameSlots;
pub use surface::RoundRobinSurface;
pub use timeline::{CompletionTimeline, PresentationSurface};
pub use tracker::FrameFenceTracker;

/// Number of frame slots used for double buffering.
pub const FRAME_COUNT: usize = 2;
