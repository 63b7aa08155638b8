mod chain;
mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use tagline_codec::{RecordConfig, DEFAULT_MAX_BLOB_SIZE};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "tagline", version, about = "Labeled record CLI")]
struct Cli {
    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        value_enum,
        default_value_t = LogFormat::default(),
        env = "TAGLINE_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        value_enum,
        default_value_t = LogLevel::default(),
        env = "TAGLINE_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Largest string or blob length accepted when reading.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_BLOB_SIZE,
        env = "TAGLINE_MAX_BLOB_SIZE",
        global = true
    )]
    max_blob_size: usize,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let config = RecordConfig {
        max_blob_size: cli.max_blob_size,
    };
    let span = tracing::debug_span!("command", name = cli.command.name());
    let result = span.in_scope(|| cmd::run(cli.command, config));

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
