//! Network definition files.
//!
//! A network is described in TOML:
//!
//! ```toml
//! [propagation]
//! prior_weight = 0.3
//!
//! [[nodes]]
//! name = "A"
//! confidence = 90.0
//! depth = 0
//! domain = "scientific"
//!
//! [[edges]]
//! parent = "A"
//! child = "B"
//! weight = 0.8
//! ```
//!
//! Nodes are added in file order, then edges; the first rejected node or
//! edge aborts the load.

use crate::error::Result;
use hben_domain::{Domain, EntailmentDag, PropagationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parsed network definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Propagation settings
    #[serde(default)]
    pub propagation: PropagationConfig,

    /// Node definitions
    #[serde(default)]
    pub nodes: Vec<NodeDef>,

    /// Edge definitions
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    /// Unique node name
    pub name: String,
    /// Confidence percentage
    pub confidence: f64,
    /// Hierarchical depth
    #[serde(default)]
    pub depth: u32,
    /// Domain name; unknown names fall back to `default`
    #[serde(default = "default_domain")]
    pub domain: String,
}

/// One `[[edges]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Entailing node
    pub parent: String,
    /// Entailed node
    pub child: String,
    /// Transmission weight; the configured default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

fn default_domain() -> String {
    Domain::Scientific.as_str().to_string()
}

impl NetworkFile {
    /// Parse a definition from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a definition file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Capture a DAG's current state as a definition.
    pub fn from_dag(dag: &EntailmentDag) -> Self {
        let nodes = dag
            .nodes()
            .map(|node| NodeDef {
                name: node.name().to_string(),
                confidence: node.confidence(),
                depth: node.depth(),
                domain: node.domain().as_str().to_string(),
            })
            .collect();
        let edges = dag
            .nodes()
            .flat_map(|node| {
                node.children().iter().map(move |child| EdgeDef {
                    parent: node.name().to_string(),
                    child: child.clone(),
                    weight: dag.edge_weight(node.name(), child),
                })
            })
            .collect();

        Self {
            propagation: dag.config().clone(),
            nodes,
            edges,
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::CliError::Config(format!("Failed to serialize network: {}", e)))
    }

    /// Build the DAG, optionally replacing the file's propagation settings.
    pub fn build(&self, preset: Option<PropagationConfig>) -> Result<EntailmentDag> {
        let config = preset.unwrap_or_else(|| self.propagation.clone());
        let default_weight = config.default_edge_weight;
        let mut dag = EntailmentDag::with_config(config);

        for def in &self.nodes {
            dag.add_node(
                def.name.clone(),
                def.confidence,
                def.depth,
                Domain::parse(&def.domain),
            )?;
        }
        for def in &self.edges {
            dag.add_edge(&def.parent, &def.child, def.weight.unwrap_or(default_weight))?;
        }

        debug!(nodes = dag.len(), edges = dag.edge_count(), "Built network");
        Ok(dag)
    }
}

/// Read a definition file and build its DAG.
pub fn load_network(path: &Path, preset: Option<PropagationConfig>) -> Result<EntailmentDag> {
    NetworkFile::read(path)?.build(preset)
}
