//! Read a record and require it to hold a known value.

use std::io::BufRead;

use uuid::Uuid;

use crate::error::{describe, CodecError, Result};
use crate::reader::RecordReader;
use crate::value::Value;

impl<T: BufRead> RecordReader<T> {
    /// Read the next record as `expected.kind()` and compare it to `expected`.
    ///
    /// Returns the decoded value on success. Decode and framing failures are
    /// reported as such; only a well-formed record holding a different value
    /// yields [`CodecError::ExpectationFailed`].
    pub fn expect_record(&mut self, label: &str, expected: &Value) -> Result<Value> {
        let actual = self.read_record(label, expected.kind())?;
        match (expected, &actual) {
            (Value::String(want), Value::String(got)) | (Value::Blob(want), Value::Blob(got)) => {
                if want.len() != got.len() {
                    return Err(mismatch(
                        label,
                        format!("{} bytes", want.len()),
                        format!("{} bytes", got.len()),
                    ));
                }
                if let Some(offset) = want.iter().zip(got.iter()).position(|(a, b)| a != b) {
                    return Err(mismatch(
                        label,
                        format!("{} at offset {offset}", describe(&Some(want[offset]))),
                        describe(&Some(got[offset])),
                    ));
                }
            }
            _ if expected != &actual => {
                return Err(mismatch(label, expected.preview(), actual.preview()));
            }
            _ => {}
        }
        tracing::debug!(label, kind = %expected.kind(), "expectation met");
        Ok(actual)
    }

    /// Expect an unsigned record equal to `expected`.
    pub fn expect_unsigned(&mut self, label: &str, expected: u64) -> Result<()> {
        self.expect_record(label, &Value::Unsigned(expected)).map(drop)
    }

    /// Expect a UUID record equal to `expected`.
    pub fn expect_uuid(&mut self, label: &str, expected: Uuid) -> Result<()> {
        self.expect_record(label, &Value::Uuid(expected)).map(drop)
    }

    /// Expect a string record with exactly the bytes of `expected`.
    pub fn expect_string(&mut self, label: &str, expected: &str) -> Result<()> {
        self.expect_record(label, &Value::string(expected)).map(drop)
    }

    /// Expect a blob record with the same length and bytes as `expected`.
    pub fn expect_blob(&mut self, label: &str, expected: &[u8]) -> Result<()> {
        let expected = Value::blob(bytes::Bytes::copy_from_slice(expected));
        self.expect_record(label, &expected).map(drop)
    }
}

fn mismatch(label: &str, expected: String, actual: String) -> CodecError {
    CodecError::ExpectationFailed {
        label: label.to_string(),
        expected,
        actual,
    }
}
