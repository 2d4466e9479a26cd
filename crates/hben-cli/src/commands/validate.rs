//! Validate command implementation.

use crate::cli::NetworkArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the validate command, returning whether the network is valid.
pub fn execute_validate(args: NetworkArgs, formatter: &Formatter) -> Result<bool> {
    let mut dag = super::load(&args)?;
    let report = dag.validate_report();
    println!("{}", formatter.format_validation(&report)?);
    Ok(report.is_valid)
}
