use tagline_codec::{RecordConfig, RecordReader};

use crate::chain::chain;
use crate::cmd::ReadArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: ReadArgs, config: RecordConfig) -> CliResult<i32> {
    let mut reader = RecordReader::with_config(std::io::stdin().lock(), config);
    let value = reader
        .read_record(&args.label, args.kind.kind())
        .map_err(|err| CliError::codec("read failed", err))?;

    if args.chain {
        chain(reader.get_mut(), &mut std::io::stdout().lock())?;
    } else if !args.quiet {
        print_value(&args.label, &value, args.format)?;
    }

    Ok(SUCCESS)
}
