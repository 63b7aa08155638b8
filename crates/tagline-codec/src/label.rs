use crate::error::{CodecError, Result};

/// Maximum label length in bytes.
pub const MAX_LABEL_LEN: usize = 80;

/// Whether `label` may appear in a record: 1 to 80 bytes of `[a-z_]`.
pub fn is_valid(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label.bytes().all(|b| b == b'_' || b.is_ascii_lowercase())
}

/// Fail with [`CodecError::InvalidLabel`] unless `label` is valid.
pub fn validate(label: &str) -> Result<()> {
    if is_valid(label) {
        Ok(())
    } else {
        Err(CodecError::InvalidLabel {
            label: label.to_string(),
        })
    }
}
