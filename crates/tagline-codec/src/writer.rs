use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};
use uuid::Uuid;

use crate::codec::{encode_borrowed, encode_length_prefix, Payload};
use crate::error::{CodecError, Result};
use crate::label::{self, MAX_LABEL_LEN};
use crate::locale::{settle, LocaleGuard};
use crate::value::{Value, ValueKind};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

// Longest label, a 20-digit length, both separators and the newline.
const MAX_FRAMING_LEN: usize = MAX_LABEL_LEN + 20 + 3;

/// String and blob payloads above this size bypass the scratch buffer.
const INLINE_PAYLOAD_LIMIT: usize = INITIAL_BUFFER_CAPACITY - MAX_FRAMING_LEN;

/// Writes labeled records to any `Write` stream.
///
/// The label and value are checked before any byte reaches the stream, so a
/// rejected record never leaves partial output behind. Small records go out
/// in one buffered write. Large string and blob payloads are written
/// straight from the caller's bytes between their framing.
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write `label:<payload>\n` and flush.
    ///
    /// The process locale is "C" while the record is produced and is
    /// restored before returning, whatever the outcome.
    pub fn write_record(&mut self, label: &str, value: &Value) -> Result<()> {
        self.write_payload(label, value.kind(), Payload::from(value))
    }

    /// Write an unsigned record.
    pub fn write_unsigned(&mut self, label: &str, value: u64) -> Result<()> {
        self.write_payload(label, ValueKind::Unsigned, Payload::Unsigned(value))
    }

    /// Write a UUID record.
    pub fn write_uuid(&mut self, label: &str, uuid: Uuid) -> Result<()> {
        self.write_payload(label, ValueKind::Uuid, Payload::Uuid(&uuid))
    }

    /// Write a string record; the length prefix is the UTF-8 byte length.
    pub fn write_string(&mut self, label: &str, text: &str) -> Result<()> {
        self.write_payload(label, ValueKind::String, Payload::Sized(text.as_bytes()))
    }

    /// Write a blob record.
    pub fn write_blob(&mut self, label: &str, data: &[u8]) -> Result<()> {
        self.write_payload(label, ValueKind::Blob, Payload::Sized(data))
    }

    fn write_payload(&mut self, label: &str, kind: ValueKind, payload: Payload<'_>) -> Result<()> {
        label::validate(label)?;

        let guard = LocaleGuard::enter()?;
        let outcome = self.write_framed(label, payload);
        let restored = guard.release();

        match &outcome {
            Ok(written) => tracing::debug!(label, kind = %kind, bytes = *written, "record written"),
            Err(err) => tracing::debug!(label, kind = %kind, error = %err, "record write failed"),
        }

        settle(outcome, restored).map(drop)
    }

    fn write_framed(&mut self, label: &str, payload: Payload<'_>) -> Result<usize> {
        self.buf.clear();
        self.buf.put_slice(label.as_bytes());
        self.buf.put_u8(b':');

        let written = match payload {
            Payload::Sized(data) if data.len() > INLINE_PAYLOAD_LIMIT => {
                encode_length_prefix(data.len(), &mut self.buf);
                write_all(&mut self.inner, &self.buf)?;
                write_all(&mut self.inner, data)?;
                write_all(&mut self.inner, b"\n")?;
                self.buf.len() + data.len() + 1
            }
            payload => {
                encode_borrowed(payload, &mut self.buf);
                self.buf.put_u8(b'\n');
                write_all(&mut self.inner, &self.buf)?;
                self.buf.len()
            }
        };

        self.flush()?;
        Ok(written)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_all<W: Write>(dst: &mut W, mut src: &[u8]) -> Result<()> {
    while !src.is_empty() {
        match dst.write(src) {
            Ok(0) => return Err(CodecError::Io(ErrorKind::WriteZero.into())),
            Ok(n) => src = &src[n..],
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        }
    }
    Ok(())
}
