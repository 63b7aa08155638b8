use std::io::{BufRead, ErrorKind, Read};

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::error::{CodecError, Result};
use crate::value::{Value, ValueKind};

/// Length of a hyphenated UUID: 8-4-4-4-12 hex digits plus four hyphens.
pub const UUID_TEXT_LEN: usize = 36;

/// Default upper bound on a declared string/blob length: 256 MiB.
pub const DEFAULT_MAX_BLOB_SIZE: usize = 256 * 1024 * 1024;

const INITIAL_BLOB_CAPACITY: usize = 8 * 1024;

/// Configuration shared by record readers and writers.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    /// Largest string/blob length a reader will accept. Default: 256 MiB.
    pub max_blob_size: usize,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            max_blob_size: DEFAULT_MAX_BLOB_SIZE,
        }
    }
}

/// Borrowed payload, so slices can be encoded without building a [`Value`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload<'a> {
    Unsigned(u64),
    Uuid(&'a Uuid),
    /// String or blob bytes, written behind a length prefix.
    Sized(&'a [u8]),
}

impl<'a> From<&'a Value> for Payload<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Unsigned(n) => Payload::Unsigned(*n),
            Value::Uuid(uuid) => Payload::Uuid(uuid),
            Value::String(data) | Value::Blob(data) => Payload::Sized(data),
        }
    }
}

/// Encode the payload of `value` (everything between `label:` and `\n`).
///
/// Payload formats:
/// ```text
/// unsigned  42
/// uuid      e4fa98a6-929a-4436-9f66-c38f9371db62
/// string    4:John
/// blob      <decimal length>:<raw bytes>
/// ```
pub fn encode_payload(value: &Value, dst: &mut BytesMut) {
    encode_borrowed(Payload::from(value), dst);
}

pub(crate) fn encode_borrowed(payload: Payload<'_>, dst: &mut BytesMut) {
    match payload {
        Payload::Unsigned(n) => encode_decimal(n, dst),
        Payload::Uuid(uuid) => {
            let mut buf = Uuid::encode_buffer();
            dst.put_slice(uuid.hyphenated().encode_lower(&mut buf).as_bytes());
        }
        Payload::Sized(data) => {
            dst.reserve(data.len() + 21);
            encode_length_prefix(data.len(), dst);
            dst.put_slice(data);
        }
    }
}

/// Encode `<len>:`, the part of a string or blob payload before its bytes.
pub(crate) fn encode_length_prefix(len: usize, dst: &mut BytesMut) {
    encode_decimal(len as u64, dst);
    dst.put_u8(b':');
}

/// Decode a payload of the requested kind, consuming nothing past it.
pub fn decode_payload<R: BufRead>(
    src: &mut R,
    kind: ValueKind,
    config: &RecordConfig,
) -> Result<Value> {
    match kind {
        ValueKind::Unsigned => decode_decimal(src, "unsigned value").map(Value::Unsigned),
        ValueKind::Uuid => decode_uuid(src).map(Value::Uuid),
        ValueKind::String => {
            decode_length_prefixed(src, "string length", config).map(Value::String)
        }
        ValueKind::Blob => decode_length_prefixed(src, "blob length", config).map(Value::Blob),
    }
}

/// Parse a canonical hyphenated UUID. Hex digits may be either case.
pub fn parse_uuid(text: &[u8]) -> Option<Uuid> {
    if text.len() != UUID_TEXT_LEN {
        return None;
    }
    Uuid::try_parse_ascii(text).ok()
}

// Digits are produced by hand so the output never depends on any locale.
fn encode_decimal(mut n: u64, dst: &mut BytesMut) {
    let mut digits = [0u8; 20];
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    dst.put_slice(&digits[pos..]);
}

fn decode_decimal<R: BufRead>(src: &mut R, context: &'static str) -> Result<u64> {
    let mut value = 0u64;
    let mut digits = 0usize;

    while let Some(b) = peek_byte(src)? {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(CodecError::Overflow { context })?;
        src.consume(1);
        digits += 1;
    }

    if digits == 0 {
        return match peek_byte(src)? {
            None => Err(CodecError::UnexpectedEof { context }),
            found => Err(CodecError::InvalidDigits { context, found }),
        };
    }
    Ok(value)
}

fn decode_uuid<R: BufRead>(src: &mut R) -> Result<Uuid> {
    let mut text = [0u8; UUID_TEXT_LEN];
    read_exact(src, &mut text, "UUID")?;
    parse_uuid(&text).ok_or_else(|| CodecError::InvalidUuid {
        text: String::from_utf8_lossy(&text).into_owned(),
    })
}

fn decode_length_prefixed<R: BufRead>(
    src: &mut R,
    context: &'static str,
    config: &RecordConfig,
) -> Result<Bytes> {
    let declared = decode_decimal(src, context)?;
    if declared > config.max_blob_size as u64 {
        return Err(CodecError::BlobTooLarge {
            size: declared,
            max: config.max_blob_size,
        });
    }
    expect_byte(src, b':', "after length")?;

    // Bounded by max_blob_size above, which is a usize.
    let declared = declared as usize;
    let mut data = Vec::with_capacity(declared.min(INITIAL_BLOB_CAPACITY));
    let actual = src.take(declared as u64).read_to_end(&mut data)?;
    if actual < declared {
        return Err(CodecError::Truncated { declared, actual });
    }
    Ok(Bytes::from(data))
}

/// Look at the next byte without consuming it. `None` at end of input.
pub(crate) fn peek_byte<R: BufRead>(src: &mut R) -> Result<Option<u8>> {
    loop {
        match src.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        }
    }
}

/// Consume one byte and require it to equal `expected`.
pub(crate) fn expect_byte<R: BufRead>(
    src: &mut R,
    expected: u8,
    position: &'static str,
) -> Result<()> {
    let found = peek_byte(src)?;
    if found.is_some() {
        src.consume(1);
    }
    if found == Some(expected) {
        Ok(())
    } else {
        Err(CodecError::MalformedFraming {
            expected: expected as char,
            position,
            found,
        })
    }
}

/// Fill `buf` completely, mapping a short stream to [`CodecError::UnexpectedEof`].
pub(crate) fn read_exact<R: Read>(src: &mut R, buf: &mut [u8], context: &'static str) -> Result<()> {
    src.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => CodecError::UnexpectedEof { context },
        _ => CodecError::Io(err),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn encoded(value: &Value) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_payload(value, &mut buf);
        buf.to_vec()
    }

    fn decode(bytes: &[u8], kind: ValueKind) -> Result<Value> {
        decode_payload(&mut Cursor::new(bytes), kind, &RecordConfig::default())
    }

    #[test]
    fn unsigned_payloads() {
        assert_eq!(encoded(&Value::Unsigned(0)), b"0");
        assert_eq!(encoded(&Value::Unsigned(42)), b"42");
        assert_eq!(encoded(&Value::Unsigned(u64::MAX)), b"18446744073709551615");
    }

    #[test]
    fn uuid_payload_is_lowercase_hyphenated() {
        let uuid = Uuid::parse_str("E4FA98A6-929A-4436-9F66-C38F9371DB62").unwrap();
        assert_eq!(
            encoded(&Value::Uuid(uuid)),
            b"e4fa98a6-929a-4436-9f66-c38f9371db62"
        );
    }

    #[test]
    fn blob_payload_is_length_prefixed() {
        assert_eq!(encoded(&Value::string("John")), b"4:John");
        assert_eq!(encoded(&Value::blob(Bytes::new())), b"0:");
        assert_eq!(encoded(&Value::blob(&b"a\n\0:"[..])), b"4:a\n\0:");
    }

    #[test]
    fn decode_stops_after_payload() {
        let mut cursor = Cursor::new(&b"123\nrest"[..]);
        let value = decode_payload(&mut cursor, ValueKind::Unsigned, &RecordConfig::default());
        assert_eq!(value.unwrap(), Value::Unsigned(123));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn decode_unsigned_errors() {
        assert!(matches!(
            decode(b"", ValueKind::Unsigned),
            Err(CodecError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            decode(b"-1", ValueKind::Unsigned),
            Err(CodecError::InvalidDigits {
                found: Some(b'-'),
                ..
            })
        ));
        assert!(matches!(
            decode(b"18446744073709551616", ValueKind::Unsigned),
            Err(CodecError::Overflow { .. })
        ));
        assert_eq!(
            decode(b"00018446744073709551615", ValueKind::Unsigned).unwrap(),
            Value::Unsigned(u64::MAX)
        );
    }

    #[test]
    fn decode_uuid_errors() {
        assert!(matches!(
            decode(b"e4fa98a6-929a-4436", ValueKind::Uuid),
            Err(CodecError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            decode(b"e4fa98a6-929a-4436-9f66-c38f9371dbzz", ValueKind::Uuid),
            Err(CodecError::InvalidUuid { .. })
        ));
        assert!(matches!(
            decode(b"e4fa98a6929a-4436-9f66-c38f9371db62-", ValueKind::Uuid),
            Err(CodecError::InvalidUuid { .. })
        ));
    }

    #[test]
    fn decode_blob_with_embedded_delimiters() {
        let value = decode(b"5:a:\n\0b", ValueKind::Blob).unwrap();
        assert_eq!(value, Value::blob(&b"a:\n\0b"[..]));
    }

    #[test]
    fn decode_blob_truncated() {
        let err = decode(b"10:abcdef", ValueKind::Blob).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                declared: 10,
                actual: 6
            }
        ));
    }

    #[test]
    fn decode_blob_requires_colon_after_length() {
        let err = decode(b"4John", ValueKind::String).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedFraming {
                expected: ':',
                found: Some(b'J'),
                ..
            }
        ));
    }

    #[test]
    fn decode_blob_respects_max_size() {
        let config = RecordConfig { max_blob_size: 4 };
        let err = decode_payload(&mut Cursor::new(&b"5:hello"[..]), ValueKind::Blob, &config)
            .unwrap_err();
        assert!(matches!(err, CodecError::BlobTooLarge { size: 5, max: 4 }));
    }

    #[test]
    fn parse_uuid_requires_canonical_length() {
        assert!(parse_uuid(b"e4fa98a6-929a-4436-9f66-c38f9371db62").is_some());
        assert!(parse_uuid(b"e4fa98a6929a44369f66c38f9371db62").is_none());
        assert!(parse_uuid(b"urn:uuid:e4fa98a6-929a-4436-9f66-c38f9371db62").is_none());
    }
}
