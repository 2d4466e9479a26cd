//! Audit command implementation.

use crate::cli::AuditArgs;
use crate::error::Result;
use crate::network::load_network;
use crate::output::Formatter;
use hben_audit::{read_rows, AuditConfig, AuditResult, AuditStatus, Auditor};
use std::fs;
use tracing::debug;

/// Execute the audit command, returning the verdict.
pub fn execute_audit(args: AuditArgs, formatter: &Formatter) -> Result<AuditStatus> {
    let result = audit(&args)?;
    println!("{}", formatter.format_audit(&result)?);
    Ok(result.status)
}

/// Audit either a network node or a CSV report, depending on `--node`.
pub fn audit(args: &AuditArgs) -> Result<AuditResult> {
    let config = if args.at_least {
        AuditConfig::at_least(args.metric.clone(), args.threshold)
    } else {
        AuditConfig::exact(args.metric.clone(), args.threshold)
    };
    let auditor = Auditor::new(config);

    match &args.node {
        Some(name) => {
            debug!(network = %args.input.display(), node = %name, "Auditing network node");
            let mut dag = load_network(&args.input, args.preset.map(Into::into))?;
            dag.propagate_rounds(args.rounds)?;
            let node = super::require_node(&dag, name)?;
            Ok(auditor.audit_node(node)?)
        }
        None => {
            debug!(report = %args.input.display(), "Auditing CSV report");
            let text = fs::read_to_string(&args.input)?;
            let rows = read_rows(&text)?;
            Ok(auditor.audit(&rows)?)
        }
    }
}
