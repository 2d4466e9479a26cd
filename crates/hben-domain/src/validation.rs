//! Structural validation of the DAG
//!
//! Validation never fails: problems are collected as issues. Depth ordering
//! is a soft consistency rule, reported but not enforced.

use crate::order::{traverse, OrderCache};
use crate::EntailmentDag;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// A single problem found by [`EntailmentDag::validate_report`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The traversal found a loop
    Cycle {
        /// Description of the offending edge
        detail: String,
    },

    /// Nodes not reached by the topological traversal
    Disconnected {
        /// Node names, sorted
        nodes: Vec<String>,
    },

    /// A child whose depth does not exceed its parent's
    DepthInconsistency {
        /// Parent node name
        parent: String,
        /// Parent depth
        parent_depth: u32,
        /// Child node name
        child: String,
        /// Child depth
        child_depth: u32,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Cycle { detail } => write!(f, "Cycle detected: {}", detail),
            ValidationIssue::Disconnected { nodes } => {
                write!(f, "Disconnected nodes: {}", nodes.join(", "))
            }
            ValidationIssue::DepthInconsistency {
                parent,
                parent_depth,
                child,
                child_depth,
            } => write!(
                f,
                "Hierarchical depth inconsistency: Parent {} depth {}, child {} depth {}",
                parent, parent_depth, child, child_depth
            ),
        }
    }
}

/// Result of validating a DAG
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True when no issues were found
    pub is_valid: bool,
    /// Issues in discovery order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Issues rendered as human-readable strings
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl EntailmentDag {
    /// Validate the structure and return `(is_valid, issue strings)`
    pub fn validate(&mut self) -> (bool, Vec<String>) {
        let report = self.validate_report();
        (report.is_valid, report.messages())
    }

    /// Validate the structure, returning typed issues
    ///
    /// Recomputes the order if it is stale. A cycle is recorded as an issue
    /// instead of being returned as an error, and nodes the traversal could
    /// not reach are reported as disconnected.
    pub fn validate_report(&mut self) -> ValidationReport {
        let mut issues = Vec::new();

        let cached = self.order.order().map(<[String]>::to_vec);
        let reached: Vec<String> = match cached {
            Some(order) => order,
            None => {
                let traversal = traverse(&self.nodes);
                match traversal.back_edge {
                    Some((parent, child)) => {
                        issues.push(ValidationIssue::Cycle {
                            detail: format!("edge from {} to {} closes a loop", parent, child),
                        });
                    }
                    None => self.order = OrderCache::Fresh(traversal.order.clone()),
                }
                traversal.order
            }
        };

        let reached: HashSet<&str> = reached.iter().map(String::as_str).collect();
        if reached.len() < self.nodes.len() {
            let disconnected: Vec<String> = self
                .nodes
                .keys()
                .filter(|name| !reached.contains(name.as_str()))
                .cloned()
                .collect();
            issues.push(ValidationIssue::Disconnected { nodes: disconnected });
        }

        for parent in self.nodes.values() {
            for child_name in parent.children() {
                let Some(child) = self.nodes.get(child_name) else {
                    continue;
                };
                if child.depth() <= parent.depth() {
                    issues.push(ValidationIssue::DepthInconsistency {
                        parent: parent.name().to_string(),
                        parent_depth: parent.depth(),
                        child: child.name().to_string(),
                        child_depth: child.depth(),
                    });
                }
            }
        }

        if issues.is_empty() {
            debug!(nodes = self.nodes.len(), "Validation passed");
        } else {
            warn!("Validation found {} issue(s)", issues.len());
        }

        ValidationReport {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    #[test]
    fn test_valid_chain() {
        let mut dag = EntailmentDag::new();
        dag.add_node("A", 90.0, 0, Domain::Scientific).unwrap();
        dag.add_node("B", 80.0, 1, Domain::Scientific).unwrap();
        dag.add_edge("A", "B", 0.8).unwrap();

        let (valid, issues) = dag.validate();
        assert!(valid);
        assert!(issues.is_empty());
        assert!(!dag.needs_reordering());
    }

    #[test]
    fn test_depth_inconsistency_reported() {
        let mut dag = EntailmentDag::new();
        dag.add_node("A", 90.0, 2, Domain::Scientific).unwrap();
        dag.add_node("B", 80.0, 2, Domain::Scientific).unwrap();
        dag.add_edge("A", "B", 0.8).unwrap();

        let (valid, issues) = dag.validate();
        assert!(!valid);
        assert_eq!(
            issues,
            vec!["Hierarchical depth inconsistency: Parent A depth 2, child B depth 2".to_string()]
        );
    }

    #[test]
    fn test_empty_dag_is_valid() {
        let mut dag = EntailmentDag::new();
        assert_eq!(dag.validate(), (true, Vec::new()));
    }

    #[test]
    fn test_cycle_and_disconnected_reported() {
        // Build the loop behind the DAG's back to exercise the reporting path
        let mut dag = EntailmentDag::new();
        dag.add_node("R", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("X", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("Y", 50.0, 2, Domain::Scientific).unwrap();
        for (p, c) in [("X", "Y"), ("Y", "X")] {
            dag.nodes.get_mut(p).unwrap().attach_child(c);
            dag.nodes.get_mut(c).unwrap().attach_parent(p);
        }

        let report = dag.validate_report();
        assert!(!report.is_valid);
        assert!(report.issues.contains(&ValidationIssue::Disconnected {
            nodes: vec!["X".to_string(), "Y".to_string()],
        }));
        // Y -> X also runs against the depth ordering
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_reachable_cycle_reported_as_issue() {
        let mut dag = EntailmentDag::new();
        dag.add_node("A", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("B", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("C", 50.0, 2, Domain::Scientific).unwrap();
        dag.add_edge("A", "B", 1.0).unwrap();
        dag.add_edge("B", "C", 1.0).unwrap();
        dag.nodes.get_mut("C").unwrap().attach_child("B");
        dag.nodes.get_mut("B").unwrap().attach_parent("C");

        let report = dag.validate_report();
        assert!(!report.is_valid);
        assert!(report.messages()[0].starts_with("Cycle detected"));
        assert!(dag.needs_reordering());
        assert!(dag.update_topological_order().is_err());
    }

    #[test]
    fn test_issue_serializes_with_kind() {
        let issue = ValidationIssue::Disconnected {
            nodes: vec!["X".to_string()],
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "disconnected");
    }
}
