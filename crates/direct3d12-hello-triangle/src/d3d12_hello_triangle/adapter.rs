use eyre::bail;
use eyre::WrapErr;
use tracing::{debug, info};
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL_11_0;
use windows::Win32::Graphics::Direct3D12::{D3D12CreateDevice, ID3D12Device};
use windows::Win32::Graphics::Dxgi::*;

/// Returns the first hardware adapter that supports Direct3D 12 feature level 11.0.
///
/// Adapters are enumerated in GPU preference order when `IDXGIFactory6` is
/// available, falling back to plain `EnumAdapters1` order. Software adapters
/// are skipped; pass `-warp` for the software rasterizer.
pub fn get_hardware_adapter(
    factory: &IDXGIFactory4,
    prefer_high_performance: bool,
) -> eyre::Result<IDXGIAdapter1> {
    if let Ok(factory6) = factory.cast::<IDXGIFactory6>() {
        let preference = if prefer_high_performance {
            DXGI_GPU_PREFERENCE_HIGH_PERFORMANCE
        } else {
            DXGI_GPU_PREFERENCE_UNSPECIFIED
        };
        for i in 0.. {
            let Ok(adapter) =
                (unsafe { factory6.EnumAdapterByGpuPreference::<IDXGIAdapter1>(i, preference) })
            else {
                break;
            };
            if supports_d3d12(i, &adapter)? {
                return Ok(adapter);
            }
        }
    }

    for i in 0.. {
        let adapter = match unsafe { factory.EnumAdapters1(i) } {
            Ok(adapter) => adapter,
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break,
            Err(e) => return Err(e).wrap_err("EnumAdapters1 failed"),
        };
        if supports_d3d12(i, &adapter)? {
            return Ok(adapter);
        }
    }

    bail!("No suitable D3D12 hardware adapter found.")
}

fn supports_d3d12(index: u32, adapter: &IDXGIAdapter1) -> eyre::Result<bool> {
    let desc = unsafe { adapter.GetDesc1() }.wrap_err("GetDesc1 failed")?;
    let name = String::from_utf16_lossy(&desc.Description);
    let name = name.trim_end_matches('\0');

    if (DXGI_ADAPTER_FLAG(desc.Flags as i32) & DXGI_ADAPTER_FLAG_SOFTWARE) != DXGI_ADAPTER_FLAG_NONE
    {
        debug!(index, name, "Skipping software adapter");
        return Ok(false);
    }

    // Probe without creating the device yet.
    let supported = unsafe {
        D3D12CreateDevice(
            adapter,
            D3D_FEATURE_LEVEL_11_0,
            std::ptr::null_mut::<Option<ID3D12Device>>(),
        )
    }
    .is_ok();

    if supported {
        info!(index, name, "Using hardware adapter");
    } else {
        debug!(index, name, "Adapter does not support feature level 11.0");
    }
    Ok(supported)
}
