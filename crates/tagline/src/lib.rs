//! Labeled, line-oriented records for composable test fixtures.
//!
//! tagline writes and reads typed values (unsigned integers, UUIDs, strings
//! and blobs) as `label:payload\n` records, and can assert that the next
//! record on a stream holds an expected value. The `tagline` binary exposes
//! the same operations over stdin/stdout so shell pipelines can build and
//! verify fixtures.
//!
//! # Crate Structure
//!
//! - [`codec`]: label validation, record framing and the per-type codecs

/// Re-export codec types.
pub mod codec {
    pub use tagline_codec::*;
}
