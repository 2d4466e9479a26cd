//! Evidence (bottom-up propagation) command implementation.

use crate::cli::{Assignment, EvidenceArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use hben_domain::{EntailmentDag, WeightedEvidence};
use std::collections::HashMap;

/// Execute the evidence command.
pub fn execute_evidence(args: EvidenceArgs, formatter: &Formatter) -> Result<()> {
    let mut dag = super::load(&args.network)?;
    println!("{}", apply_evidence(&mut dag, &args.leaves, formatter)?);
    Ok(())
}

/// Apply leaf evidence bottom-up and render the affected ancestors.
pub fn apply_evidence(
    dag: &mut EntailmentDag,
    leaves: &[Assignment],
    formatter: &Formatter,
) -> Result<String> {
    if let Some(bad) = leaves.iter().find(|a| !(0.0..=1.0).contains(&a.value)) {
        return Err(CliError::InvalidInput(format!(
            "evidence strength for {} must be in [0, 1], got {}",
            bad.name, bad.value
        )));
    }

    let names: Vec<&str> = leaves.iter().map(|a| a.name.as_str()).collect();
    let evidence: HashMap<String, f64> = leaves.iter().map(|a| (a.name.clone(), a.value)).collect();

    let affected = dag.propagate_bottom_up(&names, &evidence, &WeightedEvidence)?;
    formatter.format_affected("Bottom-up propagation", &affected, dag)
}
