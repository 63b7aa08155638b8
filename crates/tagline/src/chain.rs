use std::io::{self, Read, Write};

use crate::exit::{CliError, CliResult};

/// Copy everything left on `src` to `dst` verbatim.
pub fn chain<R: Read + ?Sized, W: Write + ?Sized>(src: &mut R, dst: &mut W) -> CliResult<u64> {
    let copied = io::copy(src, dst).map_err(|err| CliError::io("chain failed", err))?;
    dst.flush().map_err(|err| CliError::io("chain failed", err))?;
    tracing::debug!(bytes = copied, "chained remaining input");
    Ok(copied)
}
