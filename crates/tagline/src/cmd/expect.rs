use tagline_codec::{RecordConfig, RecordReader};

use crate::chain::chain;
use crate::cmd::ExpectArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: ExpectArgs, config: RecordConfig) -> CliResult<i32> {
    // Resolve first so a missing blob file does not consume stdin.
    let expected = args.value.resolve()?;

    let mut reader = RecordReader::with_config(std::io::stdin().lock(), config);
    let actual = reader
        .expect_record(&args.label, &expected)
        .map_err(|err| CliError::codec("expect failed", err))?;

    if args.chain {
        chain(reader.get_mut(), &mut std::io::stdout().lock())?;
    } else if !args.quiet {
        print_value(&args.label, &actual, args.format)?;
    }

    Ok(SUCCESS)
}
