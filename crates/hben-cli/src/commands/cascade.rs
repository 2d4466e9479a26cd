//! Cascade (top-down propagation) command implementation.

use crate::cli::{Assignment, CascadeArgs};
use crate::error::Result;
use crate::output::Formatter;
use hben_domain::EntailmentDag;
use std::collections::HashMap;

/// Execute the cascade command.
pub fn execute_cascade(args: CascadeArgs, formatter: &Formatter) -> Result<()> {
    let mut dag = super::load(&args.network)?;
    println!("{}", cascade(&mut dag, &args.roots, formatter)?);
    Ok(())
}

/// Apply root changes top-down and render the affected nodes.
pub fn cascade(dag: &mut EntailmentDag, roots: &[Assignment], formatter: &Formatter) -> Result<String> {
    let names: Vec<&str> = roots.iter().map(|a| a.name.as_str()).collect();
    let changes: HashMap<String, f64> = roots.iter().map(|a| (a.name.clone(), a.value)).collect();

    let affected = dag.propagate_top_down(&names, &changes)?;
    formatter.format_affected("Top-down propagation", &affected, dag)
}
