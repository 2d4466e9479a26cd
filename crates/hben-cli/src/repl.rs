//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The session owns one in-memory network, optionally loaded at startup,
//! that commands build up and propagate.

use crate::cli::{parse_assignment, Assignment, ReplArgs};
use crate::commands::{cascade::cascade, evidence::apply_evidence, order::render_order, propagate::propagate};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::network::{load_network, NetworkFile};
use crate::output::Formatter;
use hben_domain::{Domain, EntailmentDag};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;

/// Run the interactive REPL.
pub fn run_repl(args: ReplArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("HBEN REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut dag = match &args.network {
        Some(path) => {
            let dag = load_network(path, None)?;
            println!(
                "{}",
                formatter.success(&format!("Loaded {} node(s) from {}", dag.len(), path.display()))
            );
            dag
        }
        None => EntailmentDag::new(),
    };

    loop {
        let prompt = format!("hben ({} nodes)> ", dag.len());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => match execute_repl_command(cmd, &mut dag, formatter) {
                        Ok(output) => println!("{}", output),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Node {
        name: String,
        confidence: f64,
        depth: u32,
        domain: Domain,
    },
    Edge {
        parent: String,
        child: String,
        weight: Option<f64>,
    },
    Propagate(usize),
    Validate,
    Show,
    Order,
    Roots,
    Leaves,
    Cascade(Vec<Assignment>),
    Evidence(Vec<Assignment>),
    Load(PathBuf),
    Save(PathBuf),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    let args = &parts[1..];
    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "node" => parse_node_command(args),
        "edge" => parse_edge_command(args),
        "propagate" => {
            let rounds = match args.first() {
                Some(raw) => parse_number(raw, "rounds")?,
                None => 1,
            };
            Ok(ReplCommand::Propagate(rounds))
        }
        "validate" => Ok(ReplCommand::Validate),
        "show" => Ok(ReplCommand::Show),
        "order" => Ok(ReplCommand::Order),
        "roots" => Ok(ReplCommand::Roots),
        "leaves" => Ok(ReplCommand::Leaves),
        "cascade" => Ok(ReplCommand::Cascade(parse_assignments(args, "cascade <root=value>...")?)),
        "evidence" => Ok(ReplCommand::Evidence(parse_assignments(
            args,
            "evidence <leaf=strength>...",
        )?)),
        "load" => Ok(ReplCommand::Load(parse_path(args, "load <file>")?)),
        "save" => Ok(ReplCommand::Save(parse_path(args, "save <file>")?)),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// Execute a parsed command against the session network.
fn execute_repl_command(cmd: ReplCommand, dag: &mut EntailmentDag, formatter: &Formatter) -> Result<String> {
    match cmd {
        ReplCommand::Node {
            name,
            confidence,
            depth,
            domain,
        } => {
            let node = dag.add_node(name, confidence, depth, domain)?;
            Ok(formatter.success(&format!(
                "Added {} ({:.2}%, H-Factor {:.2})",
                node.name(),
                node.confidence(),
                node.hfactor()
            )))
        }
        ReplCommand::Edge {
            parent,
            child,
            weight,
        } => {
            let weight = weight.unwrap_or(dag.config().default_edge_weight);
            dag.add_edge(&parent, &child, weight)?;
            Ok(formatter.success(&format!("Linked {} -> {} (weight {})", parent, child, weight)))
        }
        ReplCommand::Propagate(rounds) => propagate(dag, &[], rounds, formatter),
        ReplCommand::Validate => formatter.format_validation(&dag.validate_report()),
        ReplCommand::Show => formatter.format_nodes(dag),
        ReplCommand::Order => render_order(dag, formatter),
        ReplCommand::Roots => formatter.format_order(&dag.get_roots()),
        ReplCommand::Leaves => formatter.format_order(&dag.get_leaves()),
        ReplCommand::Cascade(roots) => cascade(dag, &roots, formatter),
        ReplCommand::Evidence(leaves) => apply_evidence(dag, &leaves, formatter),
        ReplCommand::Load(path) => {
            *dag = load_network(&path, None)?;
            Ok(formatter.success(&format!("Loaded {} node(s) from {}", dag.len(), path.display())))
        }
        ReplCommand::Save(path) => {
            fs::write(&path, NetworkFile::from_dag(dag).to_toml()?)?;
            Ok(formatter.success(&format!("Saved {} node(s) to {}", dag.len(), path.display())))
        }
        ReplCommand::Exit | ReplCommand::Help => Ok(String::new()),
    }
}

// Simple command parsers for REPL (positional arguments only)

fn parse_node_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: node <name> <confidence> [depth] [domain]".to_string(),
        ));
    }

    let depth = match args.get(2) {
        Some(raw) => parse_number(raw, "depth")?,
        None => 0,
    };
    let domain = args.get(3).map_or(Domain::Scientific, |raw| Domain::parse(raw));

    Ok(ReplCommand::Node {
        name: args[0].to_string(),
        confidence: parse_number(args[1], "confidence")?,
        depth,
        domain,
    })
}

fn parse_edge_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: edge <parent> <child> [weight]".to_string(),
        ));
    }

    let weight = match args.get(2) {
        Some(raw) => Some(parse_number(raw, "weight")?),
        None => None,
    };

    Ok(ReplCommand::Edge {
        parent: args[0].to_string(),
        child: args[1].to_string(),
        weight,
    })
}

fn parse_assignments(args: &[&str], usage: &str) -> Result<Vec<Assignment>> {
    if args.is_empty() {
        return Err(CliError::InvalidInput(format!("Usage: {}", usage)));
    }
    args.iter()
        .map(|raw| parse_assignment(raw).map_err(CliError::InvalidInput))
        .collect()
}

fn parse_path(args: &[&str], usage: &str) -> Result<PathBuf> {
    args.first()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::InvalidInput(format!("Usage: {}", usage)))
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| CliError::InvalidInput(format!("Invalid {}: '{}'", what, raw)))
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  node <name> <conf> [depth] [domain] - Add a node");
    println!("    conf: confidence percentage");
    println!("    depth: hierarchical depth (default: 0)");
    println!("    domain: scientific|medical|social|default (default: scientific)");
    println!("  edge <parent> <child> [weight]      - Add an entailment edge");
    println!("  propagate [rounds]                  - Run steady-state propagation");
    println!("  cascade <root=value>...             - Top-down propagation");
    println!("  evidence <leaf=strength>...         - Bottom-up propagation");
    println!("  validate                            - Check structure and depths");
    println!("  show                                - List nodes");
    println!("  order                               - Show topological order");
    println!("  roots | leaves                      - List roots or leaves");
    println!("  load <file> | save <file>           - Read or write a network file");
    println!("  help, ?                             - Show this help");
    println!("  exit, quit, q                       - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn run(dag: &mut EntailmentDag, line: &str) -> Result<String> {
        execute_repl_command(parse_repl_command(line)?, dag, &quiet())
    }

    #[test]
    fn test_parse_node_defaults() {
        assert_eq!(
            parse_repl_command("node A 90").unwrap(),
            ReplCommand::Node {
                name: "A".into(),
                confidence: 90.0,
                depth: 0,
                domain: Domain::Scientific,
            }
        );
        assert!(parse_repl_command("node A").is_err());
        assert!(parse_repl_command("node A ninety").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_repl_command("q").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("propagate 3").unwrap(), ReplCommand::Propagate(3));
        assert_eq!(parse_repl_command("propagate").unwrap(), ReplCommand::Propagate(1));
        assert!(parse_repl_command("frobnicate").is_err());
        assert!(parse_repl_command("cascade").is_err());
    }

    #[test]
    fn test_session_builds_and_propagates() {
        let mut dag = EntailmentDag::new();
        run(&mut dag, "node A 90 0").unwrap();
        run(&mut dag, "node B 80 1 medical").unwrap();
        run(&mut dag, "node C 70 2").unwrap();
        run(&mut dag, "edge A B 0.8").unwrap();
        run(&mut dag, "edge B C 0.6").unwrap();

        assert_eq!(run(&mut dag, "roots").unwrap(), "A");
        assert_eq!(run(&mut dag, "leaves").unwrap(), "C");
        assert_eq!(run(&mut dag, "order").unwrap(), "A\nB\nC");

        run(&mut dag, "propagate").unwrap();
        assert!((dag.node("C").unwrap().confidence() - 81.9).abs() < 1e-9);
        assert_eq!(run(&mut dag, "validate").unwrap(), "");
    }

    #[test]
    fn test_session_rejects_cycle() {
        let mut dag = EntailmentDag::new();
        run(&mut dag, "node A 50").unwrap();
        run(&mut dag, "node B 50 1").unwrap();
        run(&mut dag, "edge A B").unwrap();
        assert_eq!(dag.edge_weight("A", "B"), Some(0.5));

        assert!(run(&mut dag, "edge B A").is_err());
        assert_eq!(dag.edge_count(), 1);
    }

    #[test]
    fn test_session_directional() {
        let mut dag = EntailmentDag::new();
        run(&mut dag, "node root 0.9").unwrap();
        run(&mut dag, "node child 0.9 1").unwrap();
        run(&mut dag, "edge root child 0.4").unwrap();

        assert_eq!(run(&mut dag, "cascade root=0.5").unwrap(), "child");
        assert_eq!(run(&mut dag, "evidence child=0.3").unwrap(), "root");
        assert!((dag.node("root").unwrap().confidence() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.toml");

        let mut dag = EntailmentDag::new();
        run(&mut dag, "node A 90").unwrap();
        run(&mut dag, "node B 80 1").unwrap();
        run(&mut dag, "edge A B 0.8").unwrap();
        run(&mut dag, &format!("save {}", path.display())).unwrap();

        let mut other = EntailmentDag::new();
        run(&mut other, &format!("load {}", path.display())).unwrap();
        assert_eq!(other.len(), 2);
        assert_eq!(other.edge_weight("A", "B"), Some(0.8));
    }
}
