use std::path::Path;

use eyre::WrapErr;
use tracing::debug;

/// Reads a whole file into memory.
pub fn read_file(path: impl AsRef<Path>) -> eyre::Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).wrap_err_with(|| format!("Cannot open file {}", path.display()))?;
    debug!(path = %path.display(), size = bytes.len(), "loaded asset");
    Ok(bytes)
}

/// Reads a whole file and appends a 0 byte, for APIs that take C strings.
pub fn read_file_terminated(path: impl AsRef<Path>) -> eyre::Result<Vec<u8>> {
    let mut bytes = read_file(path)?;
    bytes.push(0);
    Ok(bytes)
}
