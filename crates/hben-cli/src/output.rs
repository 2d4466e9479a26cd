//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use hben_audit::{AuditResult, AuditStatus};
use hben_domain::{EntailmentDag, Node, ValidationReport};
use colored::*;
use std::collections::BTreeSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format every node in the network.
    pub fn format_nodes(&self, dag: &EntailmentDag) -> Result<String> {
        let nodes: Vec<&Node> = dag.nodes().collect();
        self.format_node_list(&nodes)
    }

    /// Format the given nodes.
    fn format_node_list(&self, nodes: &[&Node]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_nodes_json(nodes),
            OutputFormat::Table => Ok(self.format_nodes_table(nodes)),
            OutputFormat::Quiet => Ok(nodes
                .iter()
                .map(|n| n.name())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_nodes_json(&self, nodes: &[&Node]) -> Result<String> {
        let json_nodes: Vec<serde_json::Value> = nodes
            .iter()
            .map(|n| {
                let interval = n.credible_interval();
                serde_json::json!({
                    "name": n.name(),
                    "confidence": n.confidence(),
                    "depth": n.depth(),
                    "domain": n.domain(),
                    "hfactor": n.hfactor(),
                    "credible_interval": {
                        "lower": interval.lower,
                        "upper": interval.upper
                    },
                    "evidence_strength": n.evidence_strength(),
                    "parents": n.parents(),
                    "children": n.children()
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_nodes)?)
    }

    fn format_nodes_table(&self, nodes: &[&Node]) -> String {
        if nodes.is_empty() {
            return self.colorize("No nodes found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Name", "Confidence", "Depth", "Domain", "H-Factor", "Interval", "Parents", "Children",
        ]);

        for node in nodes {
            let interval = node.credible_interval();
            builder.push_record([
                node.name().to_string(),
                format!("{:.2}%", node.confidence()),
                node.depth().to_string(),
                node.domain().to_string(),
                format!("{:.2}", node.hfactor()),
                format!("[{:.1}, {:.1}]", interval.lower, interval.upper),
                node.parents().join(", "),
                node.children().join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a topological order.
    pub fn format_order(&self, order: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(order)?),
            OutputFormat::Quiet => Ok(order.join("\n")),
            OutputFormat::Table => {
                if order.is_empty() {
                    return Ok(self.colorize("Network is empty.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Node"]);
                for (i, name) in order.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), name.clone()]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a validation report.
    pub fn format_validation(&self, report: &ValidationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report.messages().join("\n")),
            OutputFormat::Table => {
                if report.is_valid {
                    return Ok(self.success("Network is valid"));
                }
                let lines: Vec<String> = report
                    .messages()
                    .iter()
                    .map(|message| self.warning(message))
                    .collect();
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the nodes touched by a propagation step.
    pub fn format_affected(
        &self,
        operation: &str,
        affected: &BTreeSet<String>,
        dag: &EntailmentDag,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let nodes: serde_json::Map<String, serde_json::Value> = affected
                    .iter()
                    .filter_map(|name| dag.node(name))
                    .map(|n| (n.name().to_string(), serde_json::json!(n.confidence())))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "operation": operation,
                    "affected": nodes
                }))?)
            }
            OutputFormat::Quiet => Ok(affected.iter().cloned().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let header = self.success(&format!("{}: {} node(s) affected", operation, affected.len()));
                if affected.is_empty() {
                    return Ok(header);
                }
                let nodes: Vec<&Node> = affected.iter().filter_map(|name| dag.node(name)).collect();
                Ok(format!("{}\n{}", header, self.format_nodes_table(&nodes)))
            }
        }
    }

    /// Format an audit verdict.
    pub fn format_audit(&self, result: &AuditResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(result.status.to_string()),
            OutputFormat::Table => {
                let color = match result.status {
                    AuditStatus::Pass => "green",
                    AuditStatus::Fail => "red",
                };
                Ok(self.colorize(&result.to_string(), color))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
