//! Node module - a knowledge claim inside the entailment network

use crate::credible::{CredibleInterval, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC};
use crate::hfactor::compute_hfactor;
use crate::Domain;
use serde::Serialize;

/// A knowledge claim with a confidence percentage
///
/// The H-Factor is derived state: it is recomputed whenever confidence
/// changes. Parent and child lists are structural back-references by name;
/// the owning [`EntailmentDag`](crate::EntailmentDag) is the only code that
/// may link nodes, so they can never be wired into a cycle from outside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    name: String,
    confidence: f64,
    depth: u32,
    domain: Domain,
    hfactor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence_strength: Option<f64>,
    children: Vec<String>,
    parents: Vec<String>,
}

impl Node {
    /// Create a new node with its H-Factor computed immediately
    ///
    /// # Examples
    ///
    /// ```
    /// use hben_domain::{Domain, Node};
    ///
    /// let node = Node::new("gravity", 90.0, 0, Domain::Scientific);
    /// assert_eq!(node.hfactor(), 0.82);
    /// assert!(node.is_root() && node.is_leaf());
    /// ```
    pub fn new(name: impl Into<String>, confidence_percentage: f64, depth: u32, domain: Domain) -> Self {
        Self {
            name: name.into(),
            confidence: confidence_percentage,
            depth,
            domain,
            hfactor: compute_hfactor(confidence_percentage, depth, domain),
            evidence_strength: None,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Unique node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Confidence percentage
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Hierarchical depth (0 = foundational)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Knowledge domain
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Derived H-Factor in [0, 1]
    pub fn hfactor(&self) -> f64 {
        self.hfactor
    }

    /// Evidence strength last recorded by bottom-up propagation
    pub fn evidence_strength(&self) -> Option<f64> {
        self.evidence_strength
    }

    /// Names of child nodes, in link order
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Names of parent nodes, in link order
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// True if the node has no parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Credible interval using the default uncertainty sources
    pub fn credible_interval(&self) -> CredibleInterval {
        self.credible_interval_with(DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC)
    }

    /// Credible interval for explicit aleatoric and epistemic uncertainty
    pub fn credible_interval_with(&self, aleatoric: f64, epistemic: f64) -> CredibleInterval {
        CredibleInterval::around(self.confidence, self.hfactor, aleatoric, epistemic)
    }

    pub(crate) fn set_confidence(&mut self, confidence_percentage: f64) {
        self.confidence = confidence_percentage;
        self.hfactor = compute_hfactor(self.confidence, self.depth, self.domain);
    }

    pub(crate) fn set_evidence_strength(&mut self, strength: f64) {
        self.evidence_strength = Some(strength);
    }

    /// Record `child` as a child of this node. Only the DAG calls this, after
    /// its cycle check.
    pub(crate) fn attach_child(&mut self, child: &str) {
        self.children.push(child.to_string());
    }

    /// Record `parent` as a parent of this node.
    pub(crate) fn attach_parent(&mut self, parent: &str) {
        self.parents.push(parent.to_string());
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: 0 <= lower <= confidence <= upper <= 100
        #[test]
        fn test_interval_brackets_confidence(
            confidence in 0.0f64..=100.0,
            depth in 0u32..32,
            domain_idx in 0usize..4,
        ) {
            let node = Node::new("n", confidence, depth, Domain::all()[domain_idx]);
            let ci = node.credible_interval();
            prop_assert!(ci.lower >= 0.0);
            prop_assert!(ci.lower <= confidence, "lower {} > confidence {}", ci.lower, confidence);
            prop_assert!(confidence <= ci.upper, "confidence {} > upper {}", confidence, ci.upper);
            prop_assert!(ci.upper <= 100.0);
        }
    }
}
