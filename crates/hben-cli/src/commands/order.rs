//! Order command implementation.

use crate::cli::NetworkArgs;
use crate::error::Result;
use crate::output::Formatter;
use hben_domain::EntailmentDag;

/// Execute the order command.
pub fn execute_order(args: NetworkArgs, formatter: &Formatter) -> Result<()> {
    let mut dag = super::load(&args)?;
    println!("{}", render_order(&mut dag, formatter)?);
    Ok(())
}

/// Render the network's topological order.
pub fn render_order(dag: &mut EntailmentDag, formatter: &Formatter) -> Result<String> {
    let order = dag.topological_order()?.to_vec();
    formatter.format_order(&order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use hben_domain::Domain;

    #[test]
    fn test_render_order_quiet() {
        let mut dag = EntailmentDag::new();
        dag.add_node("B", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("A", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_edge("A", "B", 1.0).unwrap();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(render_order(&mut dag, &formatter).unwrap(), "A\nB");
    }
}
