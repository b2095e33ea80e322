//! Seams between the tracker and the graphics device.

/// A GPU execution timeline with a monotonically increasing completion counter.
///
/// On Direct3D 12 this is a command queue, an `ID3D12Fence` and an OS event:
/// `signal` is `ID3D12CommandQueue::Signal`, `completed_value` is
/// `ID3D12Fence::GetCompletedValue` and `wait_until` is
/// `SetEventOnCompletion` followed by an infinite `WaitForSingleObjectEx`.
pub trait CompletionTimeline {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Enqueues a signal that sets the counter to `value` once all work
    /// submitted before it has finished. Must not block.
    fn signal(&mut self, value: u64) -> Result<(), Self::Error>;

    /// Last counter value reported by the device.
    fn completed_value(&self) -> u64;

    /// Blocks the calling thread until the counter reaches `value`.
    ///
    /// Implementations wait on an OS primitive without a timeout; they must
    /// not spin.
    fn wait_until(&mut self, value: u64) -> Result<(), Self::Error>;
}

/// A presentation surface that owns a ring of presentable images.
pub trait PresentationSurface {
    /// Index of the image the next frame will be rendered into.
    fn current_slot(&self) -> usize;
}

impl<S: PresentationSurface + ?Sized> PresentationSurface for &S {
    fn current_slot(&self) -> usize {
        (**self).current_slot()
    }
}
