//! Show command implementation.

use crate::cli::NetworkArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the show command.
pub fn execute_show(args: NetworkArgs, formatter: &Formatter) -> Result<()> {
    let dag = super::load(&args)?;
    println!("{}", formatter.format_nodes(&dag)?);
    Ok(())
}
