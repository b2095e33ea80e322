use eyre::WrapErr;
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D12::ID3D12CommandList;

use super::populate_command_list::populate_command_list;
use super::resources::Resources;

/// Records, submits and presents one frame, then moves to the next slot.
pub fn render(resources: &mut Resources) -> eyre::Result<()> {
    populate_command_list(resources)?;

    let command_lists = [Some(
        resources
            .command_list
            .cast::<ID3D12CommandList>()
            .wrap_err("cast to ID3D12CommandList failed")?,
    )];
    unsafe { resources.command_queue.ExecuteCommandLists(&command_lists) };

    resources.surface.present(resources.sync_interval)?;

    resources.tracker.submit_and_advance(resources.frame_index)?;
    resources.frame_index = resources.tracker.acquire_next_slot(&resources.surface)?;
    Ok(())
}
