use eyre::WrapErr;
use frame_fence::PresentationSurface;
use windows::Win32::Graphics::Dxgi::*;

/// A flip-model swap chain seen as a ring of presentable images.
pub struct SwapChainSurface {
    swap_chain: IDXGISwapChain3,
}

impl SwapChainSurface {
    pub fn new(swap_chain: IDXGISwapChain3) -> Self {
        Self { swap_chain }
    }

    pub fn swap_chain(&self) -> &IDXGISwapChain3 {
        &self.swap_chain
    }

    /// Presents the current back buffer. A sync interval of 0 disables vsync.
    pub fn present(&self, sync_interval: u32) -> eyre::Result<()> {
        unsafe { self.swap_chain.Present(sync_interval, DXGI_PRESENT(0)) }
            .ok()
            .wrap_err("Present failed")
    }
}

impl PresentationSurface for SwapChainSurface {
    fn current_slot(&self) -> usize {
        unsafe { self.swap_chain.GetCurrentBackBufferIndex() as usize }
    }
}
