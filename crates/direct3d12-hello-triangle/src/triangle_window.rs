use tracing::debug;
use windows::core::w;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::window_class::WindowBehaviour;

/// The sample window. Closing it is the only input the sample reacts to;
/// everything else falls through to `DefWindowProcW`.
#[derive(Debug, Default)]
pub struct TriangleWindow;

impl WindowBehaviour for TriangleWindow {
    const CLASS_NAME: PCWSTR = w!("Direct3D12HelloTriangle");

    fn handle(&mut self, message: u32, wparam: WPARAM, lparam: LPARAM) -> bool {
        match message {
            WM_SIZE => {
                let width = (lparam.0 as usize & 0xffff) as u32;
                let height = ((lparam.0 as usize >> 16) & 0xffff) as u32;
                // The swap chain keeps the size it was created with.
                debug!(width, height, "WM_SIZE");
                false
            }
            WM_ACTIVATEAPP => {
                debug!(active = wparam.0 != 0, "WM_ACTIVATEAPP");
                false
            }
            _ => false,
        }
    }
}
