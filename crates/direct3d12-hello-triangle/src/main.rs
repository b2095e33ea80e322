#![cfg_attr(not(windows), allow(dead_code))]

pub mod assets;
pub mod config;
pub mod frame_timer;
pub mod geometry;

#[cfg(windows)]
pub mod d3d12_hello_triangle;
#[cfg(windows)]
pub mod triangle_window;
#[cfg(windows)]
pub mod window_class;

use tracing::info;

fn init_logging() {
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .init();
}

#[cfg(windows)]
pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let config = config::build_command_line()?;
    info!(?config, "Starting D3D12 hello triangle");
    app::run(&config)
}

#[cfg(not(windows))]
pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_logging();
    info!("Direct3D 12 is only available on Windows");
    eyre::bail!("this sample renders with Direct3D 12 and only runs on Windows")
}

#[cfg(windows)]
mod app {
    use eyre::WrapErr;
    use tracing::{error, info, warn};
    use windows::Win32::Foundation::*;
    use windows::Win32::System::LibraryLoader::*;
    use windows::Win32::UI::WindowsAndMessaging::*;

    use crate::config::Config;
    use crate::d3d12_hello_triangle::bind_to_window::bind_to_window;
    use crate::d3d12_hello_triangle::create_device::create_device;
    use crate::d3d12_hello_triangle::debug_messages::print_dxgi_debug_messages;
    use crate::d3d12_hello_triangle::on_destroy::on_destroy;
    use crate::d3d12_hello_triangle::render::render;
    use crate::frame_timer::FrameTimer;
    use crate::triangle_window::TriangleWindow;
    use crate::window_class::{create_window, create_window_class_struct, register_window_class};

    pub fn run(config: &Config) -> eyre::Result<()> {
        let our_module = get_handle_to_file_used_to_create_the_calling_process()?;

        let window_class = create_window_class_struct::<TriangleWindow>(our_module)?;
        register_window_class(&window_class)?;

        let (width, height) = config.window_size;
        let mut window_rect = RECT {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        // Grow the outer rectangle so the client area has the requested size.
        unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false) }
            .wrap_err("AdjustWindowRect failed")?;

        let window = create_window(
            our_module,
            window_rect,
            &config.title(),
            TriangleWindow::default(),
        )?;

        let device = create_device(config)?;
        let mut resources = match bind_to_window(&device, window.hwnd(), config) {
            Ok(resources) => resources,
            Err(e) => {
                print_dxgi_debug_messages(device.info_queue.as_ref());
                return Err(e);
            }
        };

        unsafe { _ = ShowWindow(window.hwnd(), SW_SHOW) };

        let mut timer = FrameTimer::new();
        let mut running = true;
        while running {
            running = process_pending_messages();
            if !running {
                break;
            }

            if let Err(e) = render(&mut resources) {
                error!("Render failed: {e:?}");
                print_dxgi_debug_messages(device.info_queue.as_ref());
                if let Err(idle) = on_destroy(&mut resources) {
                    warn!("Could not drain the GPU after a render failure: {idle:?}");
                }
                return Err(e.wrap_err("render loop aborted"));
            }
            timer.tick();
        }

        on_destroy(&mut resources)?;
        info!("Window closed");
        Ok(())
    }

    /// Drains the message queue. Returns false once `WM_QUIT` has been seen.
    fn process_pending_messages() -> bool {
        let mut running = true;
        let mut message = MSG::default();
        while unsafe { PeekMessageW(&mut message, None, 0, 0, PM_REMOVE) }.as_bool() {
            if message.message == WM_QUIT {
                running = false;
                continue;
            }
            unsafe {
                _ = TranslateMessage(&message);
                DispatchMessageW(&message);
            }
        }
        running
    }

    fn get_handle_to_file_used_to_create_the_calling_process() -> eyre::Result<HMODULE> {
        let mut out = Default::default();
        unsafe { GetModuleHandleExW(Default::default(), None, &mut out) }
            .wrap_err("GetModuleHandleExW failed")?;
        Ok(out)
    }
}
