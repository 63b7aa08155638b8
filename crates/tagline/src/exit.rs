//! Process exit status for each failure class.
//!
//! clap reports its own usage errors with status 2 before any command runs.

use std::fmt;
use std::io;

use tagline_codec::{CodecError, ErrorKind};

pub const SUCCESS: i32 = 0;
/// A well-formed record held a different value than expected.
pub const MISMATCH: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const NOT_FOUND: i32 = 51;
/// Input was not a well-formed record of the requested type.
pub const MALFORMED_INPUT: i32 = 60;
/// Bad label or value on the command line.
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
/// The next stage of the pipeline stopped reading (128 + SIGPIPE).
pub const PIPE_CLOSED: i32 = 141;

pub type CliResult<T> = Result<T, CliError>;

/// A failed command: the status to exit with and the line printed on stderr.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An I/O failure on stdin, stdout or a blob file.
    pub fn io(context: &str, err: io::Error) -> Self {
        Self::new(io_status(err.kind()), format!("{context}: {err}"))
    }

    /// A codec failure, classified by its [`ErrorKind`].
    ///
    /// Underlying I/O errors are unwrapped so that, for example, a missing
    /// blob file exits with [`NOT_FOUND`].
    pub fn codec(context: &str, err: CodecError) -> Self {
        match err {
            CodecError::Io(source) => Self::io(context, source),
            CodecError::File { path, source } => {
                Self::io(&format!("{context}: {}", path.display()), source)
            }
            other => Self::new(kind_status(other.kind()), format!("{context}: {other}")),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

fn io_status(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::BrokenPipe => PIPE_CLOSED,
        _ => INTERNAL,
    }
}

fn kind_status(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidArgument | ErrorKind::InvalidLabel => USAGE,
        ErrorKind::MalformedFraming | ErrorKind::Decode => MALFORMED_INPUT,
        ErrorKind::ExpectationFailed => MISMATCH,
        ErrorKind::Locale | ErrorKind::Io => INTERNAL,
    }
}
