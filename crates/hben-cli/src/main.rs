//! HBEN CLI - Command-line interface for hierarchical entailment networks.

use clap::Parser;
use hben_cli::commands;
use hben_cli::repl;
use hben_cli::{Cli, Command, Config, Formatter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr. `-v` flags win over `RUST_LOG`, which defaults to warn.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Run the parsed command, returning the process exit code.
fn run(cli: Cli) -> hben_cli::Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Using default settings: {}", e);
            Config::default()
        }),
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => repl::run_repl(Default::default(), &config, &formatter)?,
        Some(Command::Repl(args)) => repl::run_repl(args, &config, &formatter)?,
        Some(Command::Show(args)) => commands::execute_show(args, &formatter)?,
        Some(Command::Propagate(args)) => commands::execute_propagate(args, &formatter)?,
        Some(Command::Validate(args)) => {
            if !commands::execute_validate(args, &formatter)? {
                return Ok(1);
            }
        }
        Some(Command::Order(args)) => commands::execute_order(args, &formatter)?,
        Some(Command::Cascade(args)) => commands::execute_cascade(args, &formatter)?,
        Some(Command::Evidence(args)) => commands::execute_evidence(args, &formatter)?,
        Some(Command::Export(args)) => commands::execute_export(args, &formatter)?,
        Some(Command::Audit(args)) => {
            return Ok(commands::execute_audit(args, &formatter)?.exit_code());
        }
    }

    Ok(0)
}
