//! Propagate command implementation.

use crate::cli::{Assignment, PropagateArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use hben_domain::EntailmentDag;
use tracing::info;

/// Execute the propagate command.
pub fn execute_propagate(args: PropagateArgs, formatter: &Formatter) -> Result<()> {
    let mut dag = super::load(&args.network)?;
    println!("{}", propagate(&mut dag, &args.set, args.rounds, formatter)?);
    Ok(())
}

/// Apply confidence overrides, run `rounds` passes and render the result.
pub fn propagate(
    dag: &mut EntailmentDag,
    overrides: &[Assignment],
    rounds: usize,
    formatter: &Formatter,
) -> Result<String> {
    if rounds == 0 {
        return Err(CliError::InvalidInput("rounds must be at least 1".to_string()));
    }
    for Assignment { name, value } in overrides {
        dag.set_confidence(name, *value)?;
    }

    let updates = dag.propagate_rounds(rounds)?;
    info!(rounds, updates, "Propagated network");

    let nodes = formatter.format_nodes(dag)?;
    match formatter.format() {
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            formatter.success(&format!(
                "Propagated {} round(s), {} update(s)",
                rounds, updates
            )),
            nodes
        )),
        _ => Ok(nodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hben_domain::{Domain, HbenError};

    fn chain() -> EntailmentDag {
        let mut dag = EntailmentDag::new();
        dag.add_node("A", 90.0, 0, Domain::Scientific).unwrap();
        dag.add_node("B", 80.0, 1, Domain::Scientific).unwrap();
        dag.add_edge("A", "B", 0.8).unwrap();
        dag
    }

    #[test]
    fn test_propagate_with_override() {
        let mut dag = chain();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let overrides = vec![Assignment { name: "A".into(), value: 50.0 }];

        propagate(&mut dag, &overrides, 1, &formatter).unwrap();
        // 0.3 * 80 + 0.7 * 50
        assert!((dag.node("B").unwrap().confidence() - 59.0).abs() < 1e-9);
    }

    #[test]
    fn test_propagate_unknown_override() {
        let mut dag = chain();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let overrides = vec![Assignment { name: "Z".into(), value: 50.0 }];

        let err = propagate(&mut dag, &overrides, 1, &formatter).unwrap_err();
        assert!(matches!(err, CliError::Network(HbenError::MissingNode(_))));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut dag = chain();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(propagate(&mut dag, &[], 0, &formatter).is_err());
    }
}
