use std::fmt;

use bytes::Bytes;
use uuid::Uuid;

use crate::error::{CodecError, Result};

/// The four value types a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unsigned,
    Uuid,
    String,
    Blob,
}

impl ValueKind {
    /// Lowercase name used in diagnostics and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Unsigned => "unsigned",
            ValueKind::Uuid => "uuid",
            ValueKind::String => "string",
            ValueKind::Blob => "blob",
        }
    }

    /// Build a value of this kind from a textual argument.
    ///
    /// Unsigned values must be plain decimal digits and fit in a `u64`.
    /// UUIDs must be in the 36-character hyphenated form. Strings are taken
    /// verbatim. Blobs cannot be given inline; load them with
    /// [`crate::file::load`] instead.
    pub fn parse_argument(self, text: &str) -> Result<Value> {
        match self {
            ValueKind::Unsigned => parse_unsigned_argument(text).map(Value::Unsigned),
            ValueKind::Uuid => parse_uuid_argument(text).map(Value::Uuid),
            ValueKind::String => Ok(Value::String(Bytes::copy_from_slice(text.as_bytes()))),
            ValueKind::Blob => Err(CodecError::InvalidArgument(
                "blob values are read from a file".to_string(),
            )),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded or to-be-encoded record payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unsigned(u64),
    Uuid(Uuid),
    /// Text bytes, not necessarily UTF-8, without any terminator.
    String(Bytes),
    Blob(Bytes),
}

impl Value {
    /// Convenience constructor for string values.
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Bytes::copy_from_slice(text.as_ref().as_bytes()))
    }

    /// Convenience constructor for blob values.
    pub fn blob(data: impl Into<Bytes>) -> Self {
        Value::Blob(data.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unsigned(_) => ValueKind::Unsigned,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::String(_) => ValueKind::String,
            Value::Blob(_) => ValueKind::Blob,
        }
    }

    /// Payload bytes for string and blob values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(data) | Value::Blob(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    /// Full text of the value, as echoed by the CLI.
    ///
    /// Binary blobs are summarised rather than dumped.
    pub fn to_text(&self) -> String {
        match self {
            Value::Unsigned(n) => n.to_string(),
            Value::Uuid(uuid) => uuid.hyphenated().to_string(),
            Value::String(data) => String::from_utf8_lossy(data).into_owned(),
            Value::Blob(data) => match std::str::from_utf8(data) {
                Ok(text) => text.to_string(),
                Err(_) => format!("<binary {} bytes>", data.len()),
            },
        }
    }

    /// Short text for logs and error messages.
    ///
    /// Strings and blobs longer than [`PREVIEW_LIMIT`] bytes are cut and
    /// suffixed with their full length.
    pub fn preview(&self) -> String {
        match self {
            Value::String(data) | Value::Blob(data) if data.len() > PREVIEW_LIMIT => {
                let head = &data[..PREVIEW_LIMIT];
                match (self, text_prefix(head)) {
                    (_, Some(text)) => format!("{text}... ({} bytes)", data.len()),
                    (Value::String(_), None) => {
                        format!("{}... ({} bytes)", String::from_utf8_lossy(head), data.len())
                    }
                    _ => format!("<binary {} bytes>", data.len()),
                }
            }
            _ => self.to_text(),
        }
    }
}

/// Longest string or blob prefix shown by [`Value::preview`].
pub const PREVIEW_LIMIT: usize = 64;

fn text_prefix(head: &[u8]) -> Option<&str> {
    match std::str::from_utf8(head) {
        Ok(text) => Some(text),
        // A multi-byte character cut at the end of the window.
        Err(err) if err.error_len().is_none() => std::str::from_utf8(&head[..err.valid_up_to()]).ok(),
        Err(_) => None,
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Unsigned(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

fn parse_unsigned_argument(text: &str) -> Result<u64> {
    if text.is_empty() {
        return Err(CodecError::InvalidArgument(
            "empty unsigned value".to_string(),
        ));
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidArgument(format!(
            "invalid unsigned value {text:?}"
        )));
    }
    text.parse().map_err(|_| {
        CodecError::InvalidArgument(format!("unsigned value {text:?} out of range"))
    })
}

fn parse_uuid_argument(text: &str) -> Result<Uuid> {
    crate::codec::parse_uuid(text.as_bytes())
        .ok_or_else(|| CodecError::InvalidArgument(format!("invalid UUID {text:?}")))
}
