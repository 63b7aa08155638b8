use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use tagline_codec::{RecordConfig, Value, ValueKind};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod expect;
pub mod read;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one record to stdout.
    Write(WriteArgs),
    /// Read one record from stdin and print its value.
    Read(ReadArgs),
    /// Read one record from stdin and fail unless it holds the given value.
    Expect(ExpectArgs),
    /// Show version information.
    Version(VersionArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Write(_) => "write",
            Command::Read(_) => "read",
            Command::Expect(_) => "expect",
            Command::Version(_) => "version",
        }
    }
}

pub fn run(command: Command, config: RecordConfig) -> CliResult<i32> {
    match command {
        Command::Write(args) => write::run(args),
        Command::Read(args) => read::run(args, config),
        Command::Expect(args) => expect::run(args, config),
        Command::Version(args) => version::run(args),
    }
}

/// A typed value given on the command line. Exactly one must be present.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ValueArgs {
    /// Unsigned 64-bit integer in decimal.
    #[arg(long, short = 'n', value_name = "N")]
    pub unsigned: Option<String>,
    /// UUID in 8-4-4-4-12 hex form.
    #[arg(long, short = 'u', value_name = "UUID")]
    pub uuid: Option<String>,
    /// String, stored with its byte length. Bytes are taken as given.
    #[arg(long, short = 's', value_name = "TEXT")]
    pub string: Option<OsString>,
    /// File whose contents form the blob.
    #[arg(long, short = 'b', value_name = "PATH")]
    pub blob: Option<PathBuf>,
}

impl ValueArgs {
    pub fn resolve(&self) -> CliResult<Value> {
        let parsed = if let Some(text) = &self.unsigned {
            ValueKind::Unsigned.parse_argument(text)
        } else if let Some(text) = &self.uuid {
            ValueKind::Uuid.parse_argument(text)
        } else if let Some(text) = &self.string {
            Ok(Value::String(text.as_encoded_bytes().to_vec().into()))
        } else if let Some(path) = &self.blob {
            tagline_codec::load(path).map(Value::Blob)
        } else {
            unreachable!("clap requires one value argument")
        };
        parsed.map_err(|err| CliError::codec("invalid value", err))
    }
}

/// The type of record to read. Exactly one must be present.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct KindArgs {
    /// Read an unsigned integer.
    #[arg(long, short = 'n')]
    pub unsigned: bool,
    /// Read a UUID.
    #[arg(long, short = 'u')]
    pub uuid: bool,
    /// Read a string.
    #[arg(long, short = 's')]
    pub string: bool,
    /// Read a blob; printed verbatim.
    #[arg(long, short = 'b')]
    pub blob: bool,
}

impl KindArgs {
    pub fn kind(&self) -> ValueKind {
        if self.unsigned {
            ValueKind::Unsigned
        } else if self.uuid {
            ValueKind::Uuid
        } else if self.string {
            ValueKind::String
        } else {
            ValueKind::Blob
        }
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Record label: 1-80 characters of a-z and _.
    #[arg(long, short = 'l')]
    pub label: String,
    #[command(flatten)]
    pub value: ValueArgs,
    /// Copy stdin to stdout before appending the record.
    #[arg(long, short = 'c')]
    pub chain: bool,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Record label: 1-80 characters of a-z and _.
    #[arg(long, short = 'l')]
    pub label: String,
    #[command(flatten)]
    pub kind: KindArgs,
    /// Do not print the value read.
    #[arg(long, short = 'q')]
    pub quiet: bool,
    /// After reading, copy the rest of stdin to stdout. Implies --quiet.
    #[arg(long, short = 'c')]
    pub chain: bool,
    /// How to print the value.
    #[arg(long, value_name = "FORMAT", default_value = "raw")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ExpectArgs {
    /// Record label: 1-80 characters of a-z and _.
    #[arg(long, short = 'l')]
    pub label: String,
    #[command(flatten)]
    pub value: ValueArgs,
    /// Do not print the value on success.
    #[arg(long, short = 'q')]
    pub quiet: bool,
    /// After a match, copy the rest of stdin to stdout. Implies --quiet.
    #[arg(long, short = 'c')]
    pub chain: bool,
    /// How to print the value.
    #[arg(long, value_name = "FORMAT", default_value = "raw")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
