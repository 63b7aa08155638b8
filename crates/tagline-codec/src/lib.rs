//! Labeled, line-oriented record codec.
//!
//! Every record is one line of the form `label:payload\n`:
//! - `label` is 1 to 80 bytes of `[a-z_]`
//! - unsigned integers are plain decimal digits
//! - UUIDs are 36-character lowercase hyphenated hex
//! - strings and blobs are `<length>:<raw bytes>`, the length being authoritative
//!
//! Numbers are always produced and parsed as in the "C" locale, and the
//! process locale is forced to "C" for the duration of each operation.

pub mod codec;
pub mod error;
mod expect;
pub mod file;
pub mod label;
pub mod locale;
pub mod reader;
pub mod value;
pub mod writer;

pub use codec::{decode_payload, encode_payload, RecordConfig, DEFAULT_MAX_BLOB_SIZE};
pub use error::{CodecError, ErrorKind, Result};
pub use file::load;
pub use label::{is_valid as is_valid_label, MAX_LABEL_LEN};
pub use reader::RecordReader;
pub use value::{Value, ValueKind, PREVIEW_LIMIT};
pub use writer::RecordWriter;
