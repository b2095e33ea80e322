use eyre::eyre;
use eyre::WrapErr;
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use windows::Win32::Graphics::Direct3D12::*;

/// An empty root signature that only allows the input assembler layout.
pub fn create_root_signature(device: &ID3D12Device) -> eyre::Result<ID3D12RootSignature> {
    let desc = D3D12_ROOT_SIGNATURE_DESC {
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
        ..Default::default()
    };

    let mut signature_blob: Option<ID3DBlob> = None;
    let mut error_blob: Option<ID3DBlob> = None;
    let serialized = unsafe {
        D3D12SerializeRootSignature(
            &desc,
            D3D_ROOT_SIGNATURE_VERSION_1,
            &mut signature_blob,
            Some(&mut error_blob),
        )
    };
    if let Err(e) = serialized {
        let details = error_blob.as_ref().map(blob_text).unwrap_or_default();
        return Err(e).wrap_err(format!("D3D12SerializeRootSignature failed: {details}"));
    }
    let signature_blob =
        signature_blob.ok_or_else(|| eyre!("D3D12SerializeRootSignature returned no blob"))?;

    unsafe {
        device.CreateRootSignature(
            0,
            std::slice::from_raw_parts(
                signature_blob.GetBufferPointer() as *const u8,
                signature_blob.GetBufferSize(),
            ),
        )
    }
    .wrap_err("CreateRootSignature failed")
}

/// Text carried by an error blob from the serializer or the shader compiler.
pub fn blob_text(blob: &ID3DBlob) -> String {
    let bytes = unsafe {
        std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
    };
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', '\n', '\r'])
        .to_owned()
}
