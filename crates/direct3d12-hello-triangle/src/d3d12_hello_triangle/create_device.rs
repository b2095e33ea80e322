use eyre::eyre;
use eyre::WrapErr;
use tracing::{info, warn};
use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL_11_0;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::config::Config;

use super::adapter::get_hardware_adapter;

pub struct DeviceContext {
    pub dxgi_factory: IDXGIFactory4,
    pub device: ID3D12Device,
    /// Present only when the debug layer is enabled.
    pub info_queue: Option<IDXGIInfoQueue>,
}

pub fn create_device(config: &Config) -> eyre::Result<DeviceContext> {
    let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
    let mut info_queue = None;

    if cfg!(debug_assertions) && enable_debug_layer() {
        factory_flags |= DXGI_CREATE_FACTORY_DEBUG;
        match unsafe { DXGIGetDebugInterface1::<IDXGIInfoQueue>(0) } {
            Ok(queue) => info_queue = Some(queue),
            Err(e) => warn!("Failed to get DXGI info queue: {e}"),
        }
    }

    let dxgi_factory: IDXGIFactory4 =
        unsafe { CreateDXGIFactory2(factory_flags) }.wrap_err("CreateDXGIFactory2 failed")?;

    let adapter: IDXGIAdapter1 = if config.use_warp_device {
        info!("Using WARP adapter");
        unsafe { dxgi_factory.EnumWarpAdapter() }.wrap_err("EnumWarpAdapter failed")?
    } else {
        get_hardware_adapter(&dxgi_factory, config.prefer_high_performance_adapter)?
    };

    let mut device: Option<ID3D12Device> = None;
    unsafe { D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_11_0, &mut device) }
        .wrap_err("D3D12CreateDevice failed")?;
    let device = device.ok_or_else(|| eyre!("D3D12CreateDevice returned no device"))?;

    Ok(DeviceContext {
        dxgi_factory,
        device,
        info_queue,
    })
}

/// Turns on the D3D12 debug layer, with GPU-based validation when the
/// runtime offers `ID3D12Debug1`.
fn enable_debug_layer() -> bool {
    unsafe {
        let mut debug1: Option<ID3D12Debug1> = None;
        if let Some(debug1) = D3D12GetDebugInterface(&mut debug1).ok().and(debug1) {
            debug1.EnableDebugLayer();
            debug1.SetEnableGPUBasedValidation(true);
            info!("D3D12 Debug Layer Enabled (GPU-based validation)");
            return true;
        }

        let mut debug: Option<ID3D12Debug> = None;
        if let Some(debug) = D3D12GetDebugInterface(&mut debug).ok().and(debug) {
            debug.EnableDebugLayer();
            info!("D3D12 Debug Layer Enabled");
            return true;
        }
    }
    warn!("D3D12 Debug Layer unavailable");
    false
}
