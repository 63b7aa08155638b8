use std::path::PathBuf;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied value could not be used.
    InvalidArgument,
    /// A label violates the `[a-z_]{1,80}` grammar.
    InvalidLabel,
    /// The process locale could not be saved, switched or restored.
    Locale,
    /// Missing `:` or `\n`, or the record carries a different label.
    MalformedFraming,
    /// The payload could not be decoded.
    Decode,
    /// The record decoded cleanly but holds a different value.
    ExpectationFailed,
    /// The underlying stream or file failed.
    Io,
}

/// Errors that can occur while writing, reading or expecting records.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A caller-supplied value is unusable (bad number, bad UUID, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The label is empty, too long or contains bytes outside `[a-z_]`.
    #[error("invalid label {label:?} (expected 1-80 bytes of [a-z_])")]
    InvalidLabel { label: String },

    /// Saving, forcing or restoring the process locale failed.
    #[error("locale error: {0}")]
    Locale(String),

    /// The record on the stream carries another label.
    #[error("expected label {expected:?} but found {found:?}")]
    LabelMismatch { expected: String, found: String },

    /// A framing byte (`:` or `\n`) is missing.
    #[error("malformed record: expected {expected:?} {position}, found {}", describe(.found))]
    MalformedFraming {
        expected: char,
        position: &'static str,
        found: Option<u8>,
    },

    /// The stream ended in the middle of a required field.
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    /// A decimal field is empty or starts with a non-digit.
    #[error("invalid {context}: expected decimal digits, found {}", describe(.found))]
    InvalidDigits {
        context: &'static str,
        found: Option<u8>,
    },

    /// A decimal field does not fit its target type.
    #[error("{context} out of range")]
    Overflow { context: &'static str },

    /// The 36 bytes read are not a canonical hyphenated UUID.
    #[error("invalid UUID {text:?}")]
    InvalidUuid { text: String },

    /// The payload ended before its declared length.
    #[error("truncated payload: declared {declared} bytes, got {actual}")]
    Truncated { declared: usize, actual: usize },

    /// The declared payload length exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    BlobTooLarge { size: u64, max: usize },

    /// The record holds a different value than the one expected.
    #[error("label {label:?}: expected {expected} but found {actual}")]
    ExpectationFailed {
        label: String,
        expected: String,
        actual: String,
    },

    /// Reading the file at `path` failed.
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CodecError::InvalidLabel { .. } => ErrorKind::InvalidLabel,
            CodecError::Locale(_) => ErrorKind::Locale,
            CodecError::LabelMismatch { .. } | CodecError::MalformedFraming { .. } => {
                ErrorKind::MalformedFraming
            }
            CodecError::UnexpectedEof { .. }
            | CodecError::InvalidDigits { .. }
            | CodecError::Overflow { .. }
            | CodecError::InvalidUuid { .. }
            | CodecError::Truncated { .. }
            | CodecError::BlobTooLarge { .. } => ErrorKind::Decode,
            CodecError::ExpectationFailed { .. } => ErrorKind::ExpectationFailed,
            CodecError::File { .. } | CodecError::Io(_) => ErrorKind::Io,
        }
    }
}

pub(crate) fn describe(found: &Option<u8>) -> String {
    match found {
        None => "end of input".to_string(),
        Some(b) if b.is_ascii_graphic() => format!("'{}'", *b as char),
        Some(b) => format!("byte 0x{b:02x}"),
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
