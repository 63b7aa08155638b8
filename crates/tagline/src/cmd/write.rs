use tagline_codec::{label, RecordWriter};

use crate::chain::chain;
use crate::cmd::WriteArgs;
use crate::exit::{CliError, CliResult, SUCCESS};

pub fn run(args: WriteArgs) -> CliResult<i32> {
    // Reject bad input before any chained bytes reach stdout.
    label::validate(&args.label).map_err(|err| CliError::codec("write failed", err))?;
    let value = args.value.resolve()?;

    let mut stdout = std::io::stdout().lock();
    if args.chain {
        chain(&mut std::io::stdin().lock(), &mut stdout)?;
    }

    let mut writer = RecordWriter::new(stdout);
    writer
        .write_record(&args.label, &value)
        .map_err(|err| CliError::codec("write failed", err))?;

    Ok(SUCCESS)
}
