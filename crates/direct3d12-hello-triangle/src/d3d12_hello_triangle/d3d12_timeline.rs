use eyre::WrapErr;
use frame_fence::CompletionTimeline;
use tracing::warn;
use windows::core::Error;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::System::Threading::*;

/// The direct command queue, its fence and the event the CPU blocks on.
pub struct D3d12Timeline {
    command_queue: ID3D12CommandQueue,
    fence: ID3D12Fence,
    fence_event: HANDLE,
}

impl D3d12Timeline {
    pub fn new(device: &ID3D12Device, command_queue: &ID3D12CommandQueue) -> eyre::Result<Self> {
        let fence: ID3D12Fence =
            unsafe { device.CreateFence(0, D3D12_FENCE_FLAG_NONE) }.wrap_err("CreateFence failed")?;
        let fence_event =
            unsafe { CreateEventA(None, false, false, None) }.wrap_err("CreateEvent failed")?;
        Ok(Self {
            command_queue: command_queue.clone(),
            fence,
            fence_event,
        })
    }
}

impl CompletionTimeline for D3d12Timeline {
    type Error = Error;

    fn signal(&mut self, value: u64) -> Result<(), Error> {
        unsafe { self.command_queue.Signal(&self.fence, value) }
    }

    fn completed_value(&self) -> u64 {
        unsafe { self.fence.GetCompletedValue() }
    }

    fn wait_until(&mut self, value: u64) -> Result<(), Error> {
        unsafe { self.fence.SetEventOnCompletion(value, self.fence_event)? };
        let wait = unsafe { WaitForSingleObjectEx(self.fence_event, INFINITE, false) };
        if wait != WAIT_OBJECT_0 {
            return Err(Error::from_win32());
        }
        Ok(())
    }
}

impl Drop for D3d12Timeline {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.fence_event) } {
            warn!("CloseHandle on the fence event failed: {e}");
        }
    }
}
