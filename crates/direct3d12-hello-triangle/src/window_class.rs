use std::ptr::NonNull;

use eyre::WrapErr;
use widestring::U16CString;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Per-window behaviour reached from the window procedure.
pub trait WindowBehaviour {
    /// The name the window class is registered under.
    const CLASS_NAME: PCWSTR;

    /// Returns true when the message was handled and `DefWindowProcW` must
    /// not run.
    fn handle(&mut self, message: u32, wparam: WPARAM, lparam: LPARAM) -> bool;
}

pub fn create_window_class_struct<W: WindowBehaviour>(instance: HMODULE) -> eyre::Result<WNDCLASSEXW> {
    // WNDCLASSEXW - https://learn.microsoft.com/en-us/windows/win32/api/winuser/ns-winuser-wndclassexw
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<W>),
        hInstance: instance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.wrap_err("LoadCursorW failed")?,
        lpszClassName: W::CLASS_NAME,
        ..Default::default()
    };
    Ok(wc)
}

pub fn register_window_class(class: &WNDCLASSEXW) -> eyre::Result<u16> {
    let atom = unsafe { RegisterClassExW(class) };
    if atom == 0 {
        return Err(Error::from_win32()).wrap_err("RegisterClassExW failed");
    }
    Ok(atom)
}

/// A created window and the behaviour its window procedure dispatches to.
pub struct Window<W> {
    hwnd: HWND,
    // GWLP_USERDATA points into this box.
    _behaviour: Box<W>,
}

impl<W> Window<W> {
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl<W> Drop for Window<W> {
    fn drop(&mut self) {
        // Late messages must not reach the behaviour once it is freed.
        unsafe { SetWindowLongPtrW(self.hwnd, GWLP_USERDATA, 0) };
    }
}

pub fn create_window<W: WindowBehaviour>(
    our_module: HMODULE,
    window_rect: RECT,
    title: &str,
    behaviour: W,
) -> eyre::Result<Window<W>> {
    let title = U16CString::from_str(title).wrap_err("window title contains a nul character")?;
    let mut behaviour = Box::new(behaviour);
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            W::CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None, // no parent window
            None, // no menus
            Some(our_module.into()),
            Some(&mut *behaviour as *mut W as *const std::ffi::c_void),
        )
    }
    .wrap_err("CreateWindowExW failed")?;
    Ok(Window {
        hwnd,
        _behaviour: behaviour,
    })
}

// Panics must not unwind across the FFI boundary.
fn dispatch<W: WindowBehaviour>(
    behaviour: &mut W,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> bool {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        behaviour.handle(message, wparam, lparam)
    }))
    .unwrap_or(false)
}

extern "system" fn wndproc<W: WindowBehaviour>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTW = &*(lparam.0 as *const CREATESTRUCTW);
            SetWindowLongPtrW(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    let user_data = unsafe { GetWindowLongPtrW(window, GWLP_USERDATA) };
    // We can get messages before WM_CREATE or after the Window is dropped.
    let Some(mut behaviour) = NonNull::new(user_data as *mut W) else {
        return unsafe { DefWindowProcW(window, message, wparam, lparam) };
    };

    let handled = match message {
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            true
        }
        _ => dispatch(unsafe { behaviour.as_mut() }, message, wparam, lparam),
    };

    if handled {
        LRESULT(0)
    } else {
        unsafe { DefWindowProcW(window, message, wparam, lparam) }
    }
}
