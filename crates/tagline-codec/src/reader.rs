use std::io::BufRead;

use bytes::Bytes;
use uuid::Uuid;

use crate::codec::{decode_payload, expect_byte, read_exact, RecordConfig};
use crate::error::{CodecError, Result};
use crate::label::{self, MAX_LABEL_LEN};
use crate::locale::{settle, LocaleGuard};
use crate::value::{Value, ValueKind};

/// Reads labeled records from any `BufRead` stream.
///
/// Never consumes past the trailing `\n` of the requested record, so the
/// remaining input can be read as further records or passed on untouched.
pub struct RecordReader<T> {
    inner: T,
    config: RecordConfig,
}

impl<T: BufRead> RecordReader<T> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RecordConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: T, config: RecordConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next record, which must carry `label` and a `kind` payload.
    ///
    /// The process locale is "C" while the record is parsed and is restored
    /// before returning, whatever the outcome.
    pub fn read_record(&mut self, label: &str, kind: ValueKind) -> Result<Value> {
        label::validate(label)?;

        let guard = LocaleGuard::enter()?;
        let outcome = self.read_framed(label, kind);
        let restored = guard.release();

        match &outcome {
            Ok(value) => tracing::debug!(label, kind = %kind, preview = %value.preview(), "record read"),
            Err(err) => tracing::debug!(label, kind = %kind, error = %err, "record read failed"),
        }

        settle(outcome, restored)
    }

    fn read_framed(&mut self, label: &str, kind: ValueKind) -> Result<Value> {
        let mut found = [0u8; MAX_LABEL_LEN];
        let found = &mut found[..label.len()];
        read_exact(&mut self.inner, found, "label")?;
        if found != label.as_bytes() {
            return Err(CodecError::LabelMismatch {
                expected: label.to_string(),
                found: String::from_utf8_lossy(found).into_owned(),
            });
        }

        expect_byte(&mut self.inner, b':', "after label")?;
        let value = decode_payload(&mut self.inner, kind, &self.config)?;
        expect_byte(&mut self.inner, b'\n', "after payload")?;
        Ok(value)
    }

    /// Read an unsigned record.
    pub fn read_unsigned(&mut self, label: &str) -> Result<u64> {
        match self.read_record(label, ValueKind::Unsigned)? {
            Value::Unsigned(n) => Ok(n),
            other => unreachable!("decoded {} for an unsigned record", other.kind()),
        }
    }

    /// Read a UUID record.
    pub fn read_uuid(&mut self, label: &str) -> Result<Uuid> {
        match self.read_record(label, ValueKind::Uuid)? {
            Value::Uuid(uuid) => Ok(uuid),
            other => unreachable!("decoded {} for a UUID record", other.kind()),
        }
    }

    /// Read a string record. The bytes are returned as stored.
    pub fn read_string(&mut self, label: &str) -> Result<Bytes> {
        match self.read_record(label, ValueKind::String)? {
            Value::String(data) => Ok(data),
            other => unreachable!("decoded {} for a string record", other.kind()),
        }
    }

    /// Read a blob record.
    pub fn read_blob(&mut self, label: &str) -> Result<Bytes> {
        match self.read_record(label, ValueKind::Blob)? {
            Value::Blob(data) => Ok(data),
            other => unreachable!("decoded {} for a blob record", other.kind()),
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

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current record reader configuration.
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }
}
