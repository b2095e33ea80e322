use std::ffi::CStr;

use eyre::eyre;
use eyre::WrapErr;
use windows::core::{s, PCSTR};
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::ID3DBlob;

use super::create_root_signature::blob_text;

pub fn compile_flags() -> u32 {
    if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    }
}

/// Compiles one entry point of nul-terminated HLSL source.
pub fn compile_shader(
    source: &[u8],
    entry_point: PCSTR,
    target: PCSTR,
    flags: u32,
) -> eyre::Result<ID3DBlob> {
    let text = CStr::from_bytes_with_nul(source).wrap_err("shader source must be nul-terminated")?;
    let text = text.to_bytes();

    let mut shader_blob: Option<ID3DBlob> = None;
    let mut error_blob: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompile(
            text.as_ptr() as *const _,
            text.len(),
            s!("shaders.hlsl"),
            None,
            None,
            entry_point,
            target,
            flags,
            0,
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    let entry = unsafe { entry_point.to_string() }.unwrap_or_default();
    if let Err(e) = result {
        let details = error_blob.as_ref().map(blob_text).unwrap_or_default();
        return Err(e).wrap_err(format!("Shader compile error ({entry}): {details}"));
    }
    shader_blob.ok_or_else(|| eyre!("D3DCompile returned no bytecode for {entry}"))
}
