use frame_fence::{FrameFenceTracker, FrameSlots};
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;

use super::d3d12_timeline::D3d12Timeline;
use super::swap_chain_surface::SwapChainSurface;
use super::FRAME_COUNT;

/// Everything that belongs to one in-flight frame. Only rewritten after the
/// tracker has confirmed the GPU is done with it.
pub struct FrameResources {
    pub render_target: ID3D12Resource,
    pub rtv_handle: D3D12_CPU_DESCRIPTOR_HANDLE,
    pub command_allocator: ID3D12CommandAllocator,
}

pub struct Resources {
    pub command_queue: ID3D12CommandQueue,
    pub surface: SwapChainSurface,
    pub frames: FrameSlots<FrameResources, FRAME_COUNT>,
    pub tracker: FrameFenceTracker<D3d12Timeline, FRAME_COUNT>,
    /// Slot whose resources are being recorded this frame.
    pub frame_index: usize,
    pub rtv_heap: ID3D12DescriptorHeap,
    pub viewport: D3D12_VIEWPORT,
    pub scissor_rect: RECT,
    pub root_signature: ID3D12RootSignature,
    pub pso: ID3D12PipelineState,
    pub command_list: ID3D12GraphicsCommandList,
    pub vertex_buffer: ID3D12Resource,
    pub vbv: D3D12_VERTEX_BUFFER_VIEW,
    pub sync_interval: u32,
}
