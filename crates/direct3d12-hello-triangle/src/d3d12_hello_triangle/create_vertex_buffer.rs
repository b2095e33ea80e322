use eyre::eyre;
use eyre::WrapErr;
use windows::core::w;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::geometry::{triangle_vertices, Vertex};

/// Uploads the triangle into an upload-heap buffer and returns it with its view.
///
/// Upload heaps are fine for three vertices; anything larger would go through
/// a default heap and a copy.
pub fn create_vertex_buffer(
    device: &ID3D12Device,
    aspect_ratio: f32,
) -> eyre::Result<(ID3D12Resource, D3D12_VERTEX_BUFFER_VIEW)> {
    let vertices = triangle_vertices(aspect_ratio);
    let vertex_buffer_size = std::mem::size_of_val(&vertices) as u64;

    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_UPLOAD,
        ..Default::default()
    };
    let resource_desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Width: vertex_buffer_size,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        ..Default::default()
    };

    let mut vertex_buffer: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_props,
            D3D12_HEAP_FLAG_NONE,
            &resource_desc,
            D3D12_RESOURCE_STATE_GENERIC_READ,
            None,
            &mut vertex_buffer,
        )
    }
    .wrap_err("CreateCommittedResource for the vertex buffer failed")?;
    let vertex_buffer =
        vertex_buffer.ok_or_else(|| eyre!("CreateCommittedResource returned no resource"))?;
    unsafe { vertex_buffer.SetName(w!("Vertex Buffer")) }.wrap_err("SetName failed")?;

    unsafe {
        let mut data = std::ptr::null_mut();
        // Empty read range: the CPU never reads this buffer.
        let read_range = D3D12_RANGE { Begin: 0, End: 0 };
        vertex_buffer
            .Map(0, Some(&read_range), Some(&mut data))
            .wrap_err("Map on the vertex buffer failed")?;
        std::ptr::copy_nonoverlapping(vertices.as_ptr(), data as *mut Vertex, vertices.len());
        vertex_buffer.Unmap(0, None);
    }

    let vbv = D3D12_VERTEX_BUFFER_VIEW {
        BufferLocation: unsafe { vertex_buffer.GetGPUVirtualAddress() },
        StrideInBytes: std::mem::size_of::<Vertex>() as u32,
        SizeInBytes: vertex_buffer_size as u32,
    };

    Ok((vertex_buffer, vbv))
}
