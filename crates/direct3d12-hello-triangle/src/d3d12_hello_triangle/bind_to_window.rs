use eyre::WrapErr;
use frame_fence::{FrameFenceTracker, FrameSlots, PresentationSurface};
use tracing::{debug, info};
use windows::core::Interface;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use super::create_device::DeviceContext;
use super::create_pipeline_state::create_pipeline_state;
use super::create_root_signature::create_root_signature;
use super::create_vertex_buffer::create_vertex_buffer;
use super::d3d12_timeline::D3d12Timeline;
use super::resources::{FrameResources, Resources};
use super::swap_chain_surface::SwapChainSurface;
use super::FRAME_COUNT;
use crate::assets::read_file_terminated;
use crate::config::Config;

/// Creates every pipeline object for `hwnd` and leaves the GPU idle.
pub fn bind_to_window(
    context: &DeviceContext,
    hwnd: HWND,
    config: &Config,
) -> eyre::Result<Resources> {
    let device = &context.device;
    let (width, height) = config.window_size;

    let command_queue: ID3D12CommandQueue = unsafe {
        device.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
            Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
            ..Default::default()
        })
    }
    .wrap_err("CreateCommandQueue failed")?;

    let swap_chain_desc = DXGI_SWAP_CHAIN_DESC1 {
        BufferCount: FRAME_COUNT as u32,
        Width: width,
        Height: height,
        Format: DXGI_FORMAT_R8G8B8A8_UNORM,
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let swap_chain: IDXGISwapChain1 = unsafe {
        context
            .dxgi_factory
            .CreateSwapChainForHwnd(&command_queue, hwnd, &swap_chain_desc, None, None)
    }
    .wrap_err("CreateSwapChainForHwnd failed")?;
    let swap_chain: IDXGISwapChain3 = swap_chain
        .cast()
        .wrap_err("swap chain does not support IDXGISwapChain3")?;

    // No fullscreen transitions.
    unsafe {
        context
            .dxgi_factory
            .MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER)
    }
    .wrap_err("MakeWindowAssociation failed")?;

    let surface = SwapChainSurface::new(swap_chain);
    let frame_index = surface.current_slot();

    let rtv_heap: ID3D12DescriptorHeap = unsafe {
        device.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
            NumDescriptors: FRAME_COUNT as u32,
            Type: D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
            ..Default::default()
        })
    }
    .wrap_err("CreateDescriptorHeap failed")?;
    let rtv_descriptor_size =
        unsafe { device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV) } as usize;
    let rtv_start = unsafe { rtv_heap.GetCPUDescriptorHandleForHeapStart() };

    let frames = FrameSlots::<FrameResources, FRAME_COUNT>::try_new(|slot| {
        let render_target: ID3D12Resource = unsafe { surface.swap_chain().GetBuffer(slot as u32) }
            .wrap_err_with(|| format!("GetBuffer({slot}) failed"))?;
        let rtv_handle = D3D12_CPU_DESCRIPTOR_HANDLE {
            ptr: rtv_start.ptr + slot * rtv_descriptor_size,
        };
        unsafe { device.CreateRenderTargetView(&render_target, None, rtv_handle) };
        let command_allocator: ID3D12CommandAllocator =
            unsafe { device.CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT) }
                .wrap_err_with(|| format!("CreateCommandAllocator for slot {slot} failed"))?;
        debug!(slot, "created frame resources");
        Ok::<_, eyre::Report>(FrameResources {
            render_target,
            rtv_handle,
            command_allocator,
        })
    })?;

    let viewport = D3D12_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: width as f32,
        Height: height as f32,
        MinDepth: D3D12_MIN_DEPTH,
        MaxDepth: D3D12_MAX_DEPTH,
    };
    let scissor_rect = RECT {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    };

    let root_signature = create_root_signature(device)?;
    let shader_source = read_file_terminated(config.resolve_shader_path()?)?;
    let pso = create_pipeline_state(device, &root_signature, &shader_source)?;

    let command_list: ID3D12GraphicsCommandList = unsafe {
        device.CreateCommandList(
            0,
            D3D12_COMMAND_LIST_TYPE_DIRECT,
            &frames.get(frame_index)?.command_allocator,
            &pso,
        )
    }
    .wrap_err("CreateCommandList failed")?;
    // Created in the recording state; the render loop expects it closed.
    unsafe { command_list.Close() }.wrap_err("Close on the new command list failed")?;

    let (vertex_buffer, vbv) = create_vertex_buffer(device, config.aspect_ratio())?;

    let timeline = D3d12Timeline::new(device, &command_queue)?;
    let mut tracker = FrameFenceTracker::<_, FRAME_COUNT>::new(timeline, frame_index)?;
    tracker.wait_for_idle()?;

    info!(width, height, frame_index, "Bound D3D12 pipeline to window");

    Ok(Resources {
        command_queue,
        surface,
        frames,
        tracker,
        frame_index,
        rtv_heap,
        viewport,
        scissor_rect,
        root_signature,
        pso,
        command_list,
        vertex_buffer,
        vbv,
        sync_interval: config.sync_interval,
    })
}
