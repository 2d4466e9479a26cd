//! Directional propagation: top-down belief changes and bottom-up evidence
//!
//! Both directions run over an explicit work set in topological order rather
//! than recursing per node, so graph depth never translates into call-stack
//! depth. Each pass first collects the affected subgraph with an owned
//! visited set, then walks the cached order once.

use crate::{EntailmentDag, HbenError, Node, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// A child node seen from its parent, with the connecting edge weight
#[derive(Debug, Clone, Copy)]
pub struct ChildLink<'a> {
    /// The child node
    pub node: &'a Node,
    /// Conditional-transmission weight of the parent -> child edge
    pub weight: f64,
}

/// Pluggable confidence model for bottom-up propagation
///
/// Implemented by [`WeightedEvidence`]; callers may supply their own.
pub trait EvidenceModel {
    /// Confidence percentage for a node whose evidence strength was just set
    fn confidence_from_evidence(&self, node: &Node) -> f64;

    /// Confidence percentage for a parent, recomputed from its children
    fn confidence_from_children(&self, node: &Node, children: &[ChildLink<'_>]) -> f64;
}

/// Default evidence model
///
/// - Evidence strength `s` in [0, 1] maps to confidence `100 * s`
/// - A parent takes the edge-weighted mean of its children's confidence,
///   keeping its current value when the weights sum to zero
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedEvidence;

impl EvidenceModel for WeightedEvidence {
    fn confidence_from_evidence(&self, node: &Node) -> f64 {
        match node.evidence_strength() {
            Some(strength) => strength * 100.0,
            None => node.confidence(),
        }
    }

    fn confidence_from_children(&self, node: &Node, children: &[ChildLink<'_>]) -> f64 {
        let total_weight: f64 = children.iter().map(|link| link.weight).sum();
        if total_weight <= 0.0 {
            return node.confidence();
        }
        children
            .iter()
            .map(|link| link.node.confidence() * link.weight)
            .sum::<f64>()
            / total_weight
    }
}

impl EntailmentDag {
    /// Push overridden confidence from roots down to their descendants
    ///
    /// Each named root present in `changes` takes its new confidence; every
    /// node below it then takes `parent confidence * edge weight`. Nodes are
    /// written in topological order, so a node with several affected parents
    /// keeps the value written by the last of them, and its own children are
    /// written only after that. Roots absent from `changes` are skipped.
    ///
    /// Overridden roots are fixed: when one lies below another, it keeps its
    /// own override and its descendants cascade from that value.
    ///
    /// Returns the names of every descendant reached. The overridden roots
    /// themselves are not included unless another overridden root reaches
    /// them.
    ///
    /// # Errors
    /// [`HbenError::MissingNode`] if a root name is unknown, or
    /// [`HbenError::InvalidInput`] if a change is not finite. Both are raised
    /// before any confidence changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use hben_domain::{Domain, EntailmentDag};
    /// use std::collections::HashMap;
    ///
    /// let mut dag = EntailmentDag::new();
    /// dag.add_node("root", 0.9, 0, Domain::Scientific).unwrap();
    /// dag.add_node("child", 0.9, 1, Domain::Scientific).unwrap();
    /// dag.add_edge("root", "child", 0.4).unwrap();
    ///
    /// let changes = HashMap::from([("root".to_string(), 0.5)]);
    /// let affected = dag.propagate_top_down(&["root"], &changes).unwrap();
    ///
    /// assert!((dag.node("child").unwrap().confidence() - 0.2).abs() < 1e-12);
    /// assert_eq!(affected.into_iter().collect::<Vec<_>>(), vec!["child".to_string()]);
    /// ```
    pub fn propagate_top_down(
        &mut self,
        roots: &[&str],
        changes: &HashMap<String, f64>,
    ) -> Result<BTreeSet<String>> {
        self.require_nodes(roots)?;
        Self::require_finite(changes)?;
        let order = self.ordered_names()?;

        let mut seeds: Vec<String> = Vec::new();
        for &root in roots {
            if let Some(&confidence) = changes.get(root) {
                self.set_confidence(root, confidence)?;
                seeds.push(root.to_string());
            }
        }

        let active = self.reachable(&seeds, Node::children);
        let fixed: HashSet<&str> = seeds.iter().map(String::as_str).collect();
        let mut affected = BTreeSet::new();

        for name in order.iter().filter(|name| active.contains(name.as_str())) {
            let Some(node) = self.nodes.get(name) else {
                continue;
            };
            let confidence = node.confidence();
            let updates: Vec<(String, f64)> = node
                .children()
                .iter()
                .map(|child| (child.clone(), confidence * self.weight_or_default(name, child)))
                .collect();

            for (child, value) in updates {
                if !fixed.contains(child.as_str()) {
                    if let Some(child_node) = self.nodes.get_mut(&child) {
                        child_node.set_confidence(value);
                    }
                }
                affected.insert(child);
            }
        }

        info!(
            roots = seeds.len(),
            affected = affected.len(),
            "Top-down propagation complete"
        );
        Ok(affected)
    }

    /// Pull new evidence from leaves up to their ancestors
    ///
    /// Each named leaf present in `evidence` records the new evidence
    /// strength and takes `model.confidence_from_evidence`. Every ancestor is
    /// then recomputed once with `model.confidence_from_children`, in reverse
    /// topological order so all of its affected children are final first.
    /// Leaves absent from `evidence` are skipped.
    ///
    /// Returns the names of every ancestor touched.
    ///
    /// # Errors
    /// [`HbenError::MissingNode`] if a leaf name is unknown, or
    /// [`HbenError::InvalidInput`] if an evidence value is not finite.
    pub fn propagate_bottom_up<M: EvidenceModel + ?Sized>(
        &mut self,
        leaves: &[&str],
        evidence: &HashMap<String, f64>,
        model: &M,
    ) -> Result<BTreeSet<String>> {
        self.require_nodes(leaves)?;
        Self::require_finite(evidence)?;
        let order = self.ordered_names()?;

        let mut seeds: Vec<String> = Vec::new();
        for &leaf in leaves {
            let Some(&strength) = evidence.get(leaf) else {
                continue;
            };
            if let Some(node) = self.nodes.get_mut(leaf) {
                node.set_evidence_strength(strength);
                let confidence = model.confidence_from_evidence(node);
                node.set_confidence(confidence);
                debug!(leaf, strength, confidence, "Applied evidence");
                seeds.push(leaf.to_string());
            }
        }

        let reached = self.reachable(&seeds, Node::parents);
        let mut affected = BTreeSet::new();

        // A reached node with no reached child is a seed that is nobody's
        // ancestor; it keeps its evidence-derived confidence.
        for name in order.iter().rev() {
            if !reached.contains(name.as_str()) || !self.has_reached_child(name, &reached) {
                continue;
            }
            let Some(node) = self.nodes.get(name) else {
                continue;
            };
            let links: Vec<ChildLink<'_>> = node
                .children()
                .iter()
                .filter_map(|child| {
                    self.nodes.get(child).map(|child_node| ChildLink {
                        node: child_node,
                        weight: self.weight_or_default(name, child),
                    })
                })
                .collect();
            let confidence = model.confidence_from_children(node, &links);

            if let Some(node) = self.nodes.get_mut(name) {
                node.set_confidence(confidence);
            }
            affected.insert(name.clone());
        }

        info!(
            leaves = seeds.len(),
            affected = affected.len(),
            "Bottom-up propagation complete"
        );
        Ok(affected)
    }

    /// Fail with `MissingNode` unless every name exists
    fn require_nodes(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.nodes.contains_key(**name)) {
            Some(missing) => Err(HbenError::MissingNode(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Fail with `InvalidInput` if any value in `values` is not finite
    fn require_finite(values: &HashMap<String, f64>) -> Result<()> {
        match values.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(HbenError::InvalidInput(format!(
                "value for {} must be finite, got {}",
                name, value
            ))),
            None => Ok(()),
        }
    }

    /// Seeds plus everything reachable from them along `next` links
    fn reachable(&self, seeds: &[String], next: fn(&Node) -> &[String]) -> HashSet<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: Vec<&str> = seeds.iter().map(String::as_str).collect();

        while let Some(current) = queue.pop() {
            if !visited.insert(current.to_string()) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                queue.extend(next(node).iter().map(String::as_str));
            }
        }

        visited
    }

    fn has_reached_child(&self, name: &str, reached: &HashSet<String>) -> bool {
        self.nodes
            .get(name)
            .is_some_and(|node| node.children().iter().any(|child| reached.contains(child)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    fn changes(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_top_down_single_edge() {
        let mut dag = EntailmentDag::new();
        dag.add_node("root", 0.9, 0, Domain::Scientific).unwrap();
        dag.add_node("child", 0.9, 1, Domain::Scientific).unwrap();
        dag.add_edge("root", "child", 0.4).unwrap();

        let affected = dag
            .propagate_top_down(&["root"], &changes(&[("root", 0.5)]))
            .unwrap();

        assert_eq!(dag.node("root").unwrap().confidence(), 0.5);
        assert!((dag.node("child").unwrap().confidence() - 0.2).abs() < 1e-12);
        assert_eq!(affected, BTreeSet::from(["child".to_string()]));
    }

    #[test]
    fn test_top_down_cascades_through_chain() {
        let mut dag = EntailmentDag::new();
        dag.add_node("a", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("b", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("c", 50.0, 2, Domain::Scientific).unwrap();
        dag.add_edge("a", "b", 0.5).unwrap();
        dag.add_edge("b", "c", 0.5).unwrap();

        let affected = dag.propagate_top_down(&["a"], &changes(&[("a", 80.0)])).unwrap();
        assert_eq!(dag.node("b").unwrap().confidence(), 40.0);
        assert_eq!(dag.node("c").unwrap().confidence(), 20.0);
        assert_eq!(affected.len(), 2);
    }

    #[test]
    fn test_top_down_keeps_override_below_another_root() {
        let mut dag = EntailmentDag::new();
        dag.add_node("a", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("b", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("c", 50.0, 2, Domain::Scientific).unwrap();
        dag.add_edge("a", "b", 0.5).unwrap();
        dag.add_edge("b", "c", 0.5).unwrap();

        let affected = dag
            .propagate_top_down(&["a", "b"], &changes(&[("a", 80.0), ("b", 10.0)]))
            .unwrap();

        assert_eq!(dag.node("a").unwrap().confidence(), 80.0);
        assert_eq!(dag.node("b").unwrap().confidence(), 10.0);
        assert_eq!(dag.node("c").unwrap().confidence(), 5.0);
        assert_eq!(
            affected,
            BTreeSet::from(["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_top_down_skips_roots_without_change() {
        let mut dag = EntailmentDag::new();
        dag.add_node("a", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("b", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_edge("a", "b", 0.5).unwrap();

        let affected = dag.propagate_top_down(&["a"], &HashMap::new()).unwrap();
        assert!(affected.is_empty());
        assert_eq!(dag.node("b").unwrap().confidence(), 50.0);
    }

    #[test]
    fn test_top_down_unknown_root_is_error() {
        let mut dag = EntailmentDag::new();
        dag.add_node("a", 50.0, 0, Domain::Scientific).unwrap();
        let err = dag
            .propagate_top_down(&["a", "ghost"], &changes(&[("a", 10.0)]))
            .unwrap_err();
        assert_eq!(err, HbenError::MissingNode("ghost".to_string()));
        assert_eq!(dag.node("a").unwrap().confidence(), 50.0);
    }

    #[test]
    fn test_top_down_diamond_children_after_all_parents() {
        //   a
        //  / \
        // b   c
        //  \ /
        //   d -> e
        let mut dag = EntailmentDag::new();
        for (name, depth) in [("a", 0), ("b", 1), ("c", 1), ("d", 2), ("e", 3)] {
            dag.add_node(name, 50.0, depth, Domain::Scientific).unwrap();
        }
        dag.add_edge("a", "b", 1.0).unwrap();
        dag.add_edge("a", "c", 0.5).unwrap();
        dag.add_edge("b", "d", 1.0).unwrap();
        dag.add_edge("c", "d", 1.0).unwrap();
        dag.add_edge("d", "e", 1.0).unwrap();

        let affected = dag.propagate_top_down(&["a"], &changes(&[("a", 80.0)])).unwrap();
        assert_eq!(affected.len(), 4);

        let d = dag.node("d").unwrap().confidence();
        assert!(d == 80.0 || d == 40.0);
        // e always follows d's final value
        assert_eq!(dag.node("e").unwrap().confidence(), d);
    }

    #[test]
    fn test_bottom_up_weighted_mean() {
        let mut dag = EntailmentDag::new();
        dag.add_node("p", 50.0, 0, Domain::Scientific).unwrap();
        dag.add_node("l1", 50.0, 1, Domain::Scientific).unwrap();
        dag.add_node("l2", 60.0, 1, Domain::Scientific).unwrap();
        dag.add_edge("p", "l1", 0.75).unwrap();
        dag.add_edge("p", "l2", 0.25).unwrap();

        let affected = dag
            .propagate_bottom_up(&["l1"], &changes(&[("l1", 0.9)]), &WeightedEvidence)
            .unwrap();

        let l1 = dag.node("l1").unwrap();
        assert_eq!(l1.evidence_strength(), Some(0.9));
        assert!((l1.confidence() - 90.0).abs() < 1e-9);
        // (90 * 0.75 + 60 * 0.25) / 1.0 = 82.5
        assert!((dag.node("p").unwrap().confidence() - 82.5).abs() < 1e-9);
        assert_eq!(affected, BTreeSet::from(["p".to_string()]));
    }

    #[test]
    fn test_bottom_up_reaches_every_ancestor_once() {
        let mut dag = EntailmentDag::new();
        for (name, depth) in [("top", 0), ("mid1", 1), ("mid2", 1), ("leaf", 2)] {
            dag.add_node(name, 0.0, depth, Domain::Social).unwrap();
        }
        dag.add_edge("top", "mid1", 1.0).unwrap();
        dag.add_edge("top", "mid2", 1.0).unwrap();
        dag.add_edge("mid1", "leaf", 1.0).unwrap();
        dag.add_edge("mid2", "leaf", 1.0).unwrap();

        let affected = dag
            .propagate_bottom_up(&["leaf"], &changes(&[("leaf", 1.0)]), &WeightedEvidence)
            .unwrap();

        assert_eq!(affected.len(), 3);
        for name in ["top", "mid1", "mid2"] {
            assert!((dag.node(name).unwrap().confidence() - 100.0).abs() < 1e-9, "{}", name);
        }
    }

    #[test]
    fn test_bottom_up_custom_model() {
        struct MaxChild;
        impl EvidenceModel for MaxChild {
            fn confidence_from_evidence(&self, node: &Node) -> f64 {
                node.evidence_strength().unwrap_or(0.0) * 50.0
            }
            fn confidence_from_children(&self, _node: &Node, children: &[ChildLink<'_>]) -> f64 {
                children.iter().map(|c| c.node.confidence()).fold(0.0, f64::max)
            }
        }

        let mut dag = EntailmentDag::new();
        dag.add_node("p", 10.0, 0, Domain::Medical).unwrap();
        dag.add_node("a", 30.0, 1, Domain::Medical).unwrap();
        dag.add_node("b", 10.0, 1, Domain::Medical).unwrap();
        dag.add_edge("p", "a", 0.1).unwrap();
        dag.add_edge("p", "b", 0.9).unwrap();

        dag.propagate_bottom_up(&["b"], &changes(&[("b", 1.0)]), &MaxChild).unwrap();
        assert_eq!(dag.node("b").unwrap().confidence(), 50.0);
        assert_eq!(dag.node("p").unwrap().confidence(), 50.0);
    }

    #[test]
    fn test_bottom_up_unknown_leaf_is_error() {
        let mut dag = EntailmentDag::new();
        let err = dag
            .propagate_bottom_up(&["nope"], &HashMap::new(), &WeightedEvidence)
            .unwrap_err();
        assert_eq!(err, HbenError::MissingNode("nope".to_string()));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut dag = EntailmentDag::new();
        let depth = 20_000;
        for i in 0..depth {
            dag.add_node(format!("n{}", i), 100.0, i, Domain::Default).unwrap();
            if i > 0 {
                dag.add_edge(&format!("n{}", i - 1), &format!("n{}", i), 1.0).unwrap();
            }
        }

        let affected = dag
            .propagate_top_down(&["n0"], &changes(&[("n0", 50.0)]))
            .unwrap();
        assert_eq!(affected.len(), depth as usize - 1);
        assert_eq!(dag.node(&format!("n{}", depth - 1)).unwrap().confidence(), 50.0);
    }
}
