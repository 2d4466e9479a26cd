//! Export command implementation.

use crate::cli::{ExportArgs, ExportFormat};
use crate::error::Result;
use crate::output::Formatter;
use hben_audit::MetricRow;
use hben_domain::EntailmentDag;
use std::fs;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, formatter: &Formatter) -> Result<()> {
    let mut dag = super::load(&args.network)?;
    let text = export(&mut dag, &args.node, &args.metric, args.rounds, args.encoding)?;

    match args.output {
        Some(path) => {
            fs::write(&path, text)?;
            println!(
                "{}",
                formatter.success(&format!("Exported {} to {}", args.node, path.display()))
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Propagate `rounds` times, then render `node` as a metric row.
pub fn export(
    dag: &mut EntailmentDag,
    node: &str,
    metric: &str,
    rounds: usize,
    encoding: ExportFormat,
) -> Result<String> {
    super::require_node(dag, node)?;
    dag.propagate_rounds(rounds)?;

    let row = MetricRow::from_node(super::require_node(dag, node)?, metric);
    match encoding {
        ExportFormat::Csv => Ok(row.to_csv()?),
        ExportFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&row)?)),
    }
}
