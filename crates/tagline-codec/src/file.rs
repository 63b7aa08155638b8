use std::path::Path;

use bytes::Bytes;

use crate::error::{CodecError, Result};

/// Read the whole file at `path` into memory.
pub fn load(path: impl AsRef<Path>) -> Result<Bytes> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| CodecError::File {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "file loaded");
    Ok(Bytes::from(data))
}
