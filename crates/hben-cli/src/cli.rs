//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use hben_audit::DEFAULT_METRIC;
use hben_domain::PropagationConfig;
use std::path::PathBuf;

/// HBEN CLI - Build, propagate and audit entailment networks.
#[derive(Debug, Parser)]
#[command(name = "hben")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HBEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every node with its confidence, H-Factor and interval
    Show(NetworkArgs),

    /// Run steady-state propagation
    Propagate(PropagateArgs),

    /// Check structure and depth consistency
    Validate(NetworkArgs),

    /// Print the topological order
    Order(NetworkArgs),

    /// Push new root confidence down to descendants
    Cascade(CascadeArgs),

    /// Pull new leaf evidence up to ancestors
    Evidence(EvidenceArgs),

    /// Export a node's confidence as a metric row
    Export(ExportArgs),

    /// Audit a metric against a required threshold
    Audit(AuditArgs),

    /// Enter interactive REPL mode
    Repl(ReplArgs),
}

/// Network file shared by most commands.
#[derive(Debug, Clone, Parser)]
pub struct NetworkArgs {
    /// Network definition file (TOML)
    pub network: PathBuf,

    /// Override the file's propagation settings with a preset
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Arguments for the propagate command.
#[derive(Debug, Parser)]
pub struct PropagateArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Number of propagation passes
    #[arg(short, long, default_value = "1")]
    pub rounds: usize,

    /// Set a node's confidence before propagating (NAME=PERCENT)
    #[arg(long = "set", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,
}

/// Arguments for the cascade command.
#[derive(Debug, Parser)]
pub struct CascadeArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// New root confidence (NAME=VALUE), repeatable
    #[arg(long = "root", value_parser = parse_assignment, required = true)]
    pub roots: Vec<Assignment>,
}

/// Arguments for the evidence command.
#[derive(Debug, Parser)]
pub struct EvidenceArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// New leaf evidence strength in [0, 1] (NAME=STRENGTH), repeatable
    #[arg(long = "leaf", value_parser = parse_assignment, required = true)]
    pub leaves: Vec<Assignment>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Node to export
    #[arg(short, long)]
    pub node: String,

    /// Metric name written to the row
    #[arg(short, long, default_value = DEFAULT_METRIC)]
    pub metric: String,

    /// Propagation passes to run before exporting
    #[arg(short, long, default_value = "0")]
    pub rounds: usize,

    /// Encoding of the exported row
    #[arg(long = "as", value_enum, default_value = "csv")]
    pub encoding: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Metric CSV report, or a network definition when --node is given
    pub input: PathBuf,

    /// Audit this node of a network instead of a CSV report
    #[arg(short, long)]
    pub node: Option<String>,

    /// Metric name to look up
    #[arg(short, long, default_value = DEFAULT_METRIC)]
    pub metric: String,

    /// Required value, in percent
    #[arg(short, long, default_value = "100")]
    pub threshold: f64,

    /// Pass when the value is at least the threshold instead of equal to it
    #[arg(long)]
    pub at_least: bool,

    /// Propagation passes to run before auditing a network node
    #[arg(short, long, default_value = "0", requires = "node")]
    pub rounds: usize,

    /// Propagation preset for a network node
    #[arg(long, value_enum, requires = "node")]
    pub preset: Option<PresetArg>,
}

/// Arguments for the REPL.
#[derive(Debug, Default, Parser)]
pub struct ReplArgs {
    /// Network definition to load at startup
    pub network: Option<PathBuf>,
}

/// Propagation preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Prior 0.3, evidence 0.7, unclamped
    Default,
    /// Prior 0.5, evidence 0.5, clamped
    Conservative,
    /// Prior 0.1, evidence 0.9, unclamped
    Responsive,
}

/// Export encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// `Metric Name,Value` header plus one row
    Csv,
    /// JSON object keyed by the CSV headers
    Json,
}

/// A `NAME=VALUE` pair from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Node name
    pub name: String,
    /// Numeric value
    pub value: f64,
}

/// Parse `NAME=VALUE`; the value must be a finite number.
pub fn parse_assignment(input: &str) -> std::result::Result<Assignment, String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", input))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing node name in '{}'", input));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", input));
    }
    Ok(Assignment {
        name: name.to_string(),
        value,
    })
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for PropagationConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => PropagationConfig::default(),
            PresetArg::Conservative => PropagationConfig::conservative(),
            PresetArg::Responsive => PropagationConfig::responsive(),
        }
    }
}
