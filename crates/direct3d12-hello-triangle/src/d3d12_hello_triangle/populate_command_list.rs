use eyre::WrapErr;
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D12::*;

use super::resources::Resources;
use super::transition_barrier::transition_barrier;

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.2, 0.4, 1.0];

/// Records the frame for `resources.frame_index`.
///
/// The caller must have acquired the slot first, otherwise its allocator may
/// still be in use by the GPU.
pub fn populate_command_list(resources: &Resources) -> eyre::Result<()> {
    let frame = resources.frames.get(resources.frame_index)?;
    let command_list = &resources.command_list;

    unsafe { frame.command_allocator.Reset() }.wrap_err("command allocator Reset failed")?;
    unsafe { command_list.Reset(&frame.command_allocator, &resources.pso) }
        .wrap_err("command list Reset failed")?;

    unsafe {
        command_list.SetGraphicsRootSignature(&resources.root_signature);
        command_list.RSSetViewports(&[resources.viewport]);
        command_list.RSSetScissorRects(&[resources.scissor_rect]);

        command_list.ResourceBarrier(&[transition_barrier(
            &frame.render_target,
            D3D12_RESOURCE_STATE_PRESENT,
            D3D12_RESOURCE_STATE_RENDER_TARGET,
        )]);

        command_list.OMSetRenderTargets(1, Some(&frame.rtv_handle), false, None);
        command_list.ClearRenderTargetView(frame.rtv_handle, &CLEAR_COLOR, None);
        command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        command_list.IASetVertexBuffers(0, Some(&[resources.vbv]));
        command_list.DrawInstanced(3, 1, 0, 0);

        command_list.ResourceBarrier(&[transition_barrier(
            &frame.render_target,
            D3D12_RESOURCE_STATE_RENDER_TARGET,
            D3D12_RESOURCE_STATE_PRESENT,
        )]);
    }

    unsafe { command_list.Close() }.wrap_err("command list Close failed")
}
