//! HBEN Domain Layer
//!
//! This crate contains the Hierarchical Bayesian Entailment Network engine:
//! a DAG of knowledge claims whose confidence flows along weighted entailment
//! edges. Everything else in the workspace (audit export, CLI) is built on the
//! types defined here.
//!
//! ## Key Concepts
//!
//! - **Node**: A knowledge claim with a confidence percentage, a hierarchical
//!   depth and a domain, plus a derived H-Factor trust score
//! - **Entailment edge**: "belief in parent supports belief in child", weighted
//!   by a conditional-transmission factor
//! - **Credible interval**: [lower, upper] percentage range around a node's
//!   confidence
//! - **Propagation**: steady-state weighted blending over topological order,
//!   plus top-down and bottom-up directional variants
//!
//! ## Example
//!
//! ```
//! use hben_domain::{Domain, EntailmentDag};
//!
//! let mut dag = EntailmentDag::new();
//! dag.add_node("A", 90.0, 0, Domain::Scientific).unwrap();
//! dag.add_node("B", 80.0, 1, Domain::Scientific).unwrap();
//! dag.add_edge("A", "B", 0.8).unwrap();
//!
//! dag.propagate_confidence().unwrap();
//! let b = dag.node("B").unwrap();
//! assert!((b.confidence() - 87.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod credible;
pub mod dag;
pub mod domain;
pub mod error;
pub mod hfactor;
pub mod node;
mod order;
pub mod propagation;
pub mod validation;

// Re-exports for convenience
pub use config::PropagationConfig;
pub use credible::CredibleInterval;
pub use dag::EntailmentDag;
pub use domain::Domain;
pub use error::{HbenError, Result};
pub use node::Node;
pub use propagation::{ChildLink, EvidenceModel, WeightedEvidence};
pub use validation::{ValidationIssue, ValidationReport};
