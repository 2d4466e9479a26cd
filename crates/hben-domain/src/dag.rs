//! Entailment DAG - owns every node and edge weight of the network

use crate::order::{traverse, OrderCache};
use crate::{Domain, HbenError, Node, PropagationConfig, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Directed acyclic graph of knowledge claims
///
/// The DAG is the only way to link nodes: [`add_edge`](Self::add_edge) runs a
/// reachability check before every insertion, so the structure is acyclic at
/// all times. The topological order is cached and recomputed lazily after
/// structural mutations.
///
/// # Examples
///
/// ```
/// use hben_domain::{Domain, EntailmentDag, HbenError};
///
/// let mut dag = EntailmentDag::new();
/// dag.add_node("A", 90.0, 0, Domain::Scientific)?;
/// dag.add_node("B", 80.0, 1, Domain::Scientific)?;
/// dag.add_edge("A", "B", 0.8)?;
///
/// let err = dag.add_edge("B", "A", 1.0).unwrap_err();
/// assert!(matches!(err, HbenError::Cycle { .. }));
/// assert_eq!(dag.edge_count(), 1);
/// # Ok::<(), HbenError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntailmentDag {
    pub(crate) nodes: BTreeMap<String, Node>,
    pub(crate) edge_weights: HashMap<(String, String), f64>,
    pub(crate) order: OrderCache,
    pub(crate) config: PropagationConfig,
}

impl EntailmentDag {
    /// Create an empty DAG with the default propagation configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty DAG with the given propagation configuration
    pub fn with_config(config: PropagationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Propagation configuration in use
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the DAG has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_weights.len()
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Iterate over all nodes, ordered by name
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Weight of the (parent, child) edge, if it exists
    pub fn edge_weight(&self, parent: &str, child: &str) -> Option<f64> {
        self.edge_weights
            .get(&(parent.to_string(), child.to_string()))
            .copied()
    }

    /// True if the cached topological order must be recomputed
    pub fn needs_reordering(&self) -> bool {
        self.order.is_stale()
    }

    /// Add a new node
    ///
    /// # Errors
    /// - [`HbenError::DuplicateNode`] if the name is taken
    /// - [`HbenError::InvalidInput`] if the confidence is not finite
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        confidence_percentage: f64,
        depth: u32,
        domain: Domain,
    ) -> Result<&Node> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            warn!("Rejected duplicate node {}", name);
            return Err(HbenError::DuplicateNode(name));
        }
        if !confidence_percentage.is_finite() {
            return Err(HbenError::InvalidInput(format!(
                "confidence for {} must be finite, got {}",
                name, confidence_percentage
            )));
        }

        let node = Node::new(name.clone(), confidence_percentage, depth, domain);
        debug!(
            node = %name,
            confidence = confidence_percentage,
            depth,
            domain = %domain,
            hfactor = node.hfactor(),
            "Added node"
        );
        self.order.invalidate();
        Ok(self.nodes.entry(name).or_insert(node))
    }

    /// Add a directed entailment edge from `parent` to `child`
    ///
    /// # Errors
    /// - [`HbenError::MissingNode`] if either endpoint is absent
    /// - [`HbenError::DuplicateEdge`] if the edge already exists
    /// - [`HbenError::Cycle`] if `parent` is reachable from `child`
    /// - [`HbenError::InvalidInput`] if the weight is not finite
    pub fn add_edge(&mut self, parent: &str, child: &str, weight: f64) -> Result<bool> {
        for name in [parent, child] {
            if !self.nodes.contains_key(name) {
                warn!("Rejected edge {} -> {}: missing node {}", parent, child, name);
                return Err(HbenError::MissingNode(name.to_string()));
            }
        }
        if !weight.is_finite() {
            return Err(HbenError::InvalidInput(format!(
                "weight for {} -> {} must be finite, got {}",
                parent, child, weight
            )));
        }
        let key = (parent.to_string(), child.to_string());
        if self.edge_weights.contains_key(&key) {
            warn!("Rejected duplicate edge {} -> {}", parent, child);
            return Err(HbenError::DuplicateEdge {
                parent: key.0,
                child: key.1,
            });
        }
        if self.would_create_cycle(parent, child) {
            warn!("Rejected edge {} -> {}: would create a cycle", parent, child);
            return Err(HbenError::Cycle {
                parent: key.0,
                child: key.1,
            });
        }

        self.link(parent, child);
        self.edge_weights.insert(key, weight);
        self.order.invalidate();
        debug!(parent, child, weight, "Added edge");
        Ok(true)
    }

    /// Check whether adding `parent -> child` would close a loop
    ///
    /// Walks forward from `child` through existing child links with an
    /// explicit stack; returns true iff `parent` is reachable. A self-edge is
    /// always a cycle. Unknown names are never part of a cycle.
    pub fn would_create_cycle(&self, parent: &str, child: &str) -> bool {
        if !self.nodes.contains_key(child) {
            return false;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![child];

        while let Some(current) = stack.pop() {
            if current == parent {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children().iter().map(String::as_str));
            }
        }

        false
    }

    /// Recompute the topological order from scratch
    ///
    /// Performs a reverse post-order depth-first traversal starting at every
    /// root. On success the cache is Fresh; on a detected cycle it stays
    /// Stale and the error names the offending edge.
    pub fn update_topological_order(&mut self) -> Result<()> {
        let traversal = traverse(&self.nodes);
        if let Some((parent, child)) = traversal.back_edge {
            return Err(HbenError::Cycle { parent, child });
        }
        debug!(nodes = traversal.order.len(), "Recomputed topological order");
        self.order = OrderCache::Fresh(traversal.order);
        Ok(())
    }

    /// Topological order, recomputing it first if stale
    pub fn topological_order(&mut self) -> Result<&[String]> {
        self.ensure_order()?;
        Ok(self.order.order().unwrap_or_default())
    }

    /// Recompute the order only if the cache is stale
    pub(crate) fn ensure_order(&mut self) -> Result<()> {
        if self.order.is_stale() {
            self.update_topological_order()?;
        }
        Ok(())
    }

    /// Snapshot of the fresh order, recomputing first if needed
    pub(crate) fn ordered_names(&mut self) -> Result<Vec<String>> {
        Ok(self.topological_order()?.to_vec())
    }

    /// Names of nodes with no parents
    pub fn get_roots(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|node| node.is_root())
            .map(|node| node.name().to_string())
            .collect()
    }

    /// Names of nodes with no children
    pub fn get_leaves(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|node| node.is_leaf())
            .map(|node| node.name().to_string())
            .collect()
    }

    /// Overwrite a node's confidence and recompute its H-Factor
    ///
    /// Not a structural change; the cached order stays valid.
    pub fn set_confidence(&mut self, name: &str, confidence_percentage: f64) -> Result<()> {
        if !confidence_percentage.is_finite() {
            return Err(HbenError::InvalidInput(format!(
                "confidence for {} must be finite, got {}",
                name, confidence_percentage
            )));
        }
        let node = self
            .nodes
            .get_mut(name)
            .ok_or_else(|| HbenError::MissingNode(name.to_string()))?;
        node.set_confidence(confidence_percentage);
        Ok(())
    }

    /// Run one steady-state propagation pass
    ///
    /// Visits nodes in topological order. Each node with parents takes the
    /// edge-weighted average of its parents' confidence and blends it with
    /// its own prior using the configured weights. Roots are left unchanged.
    /// Returns the number of nodes updated.
    pub fn propagate_confidence(&mut self) -> Result<usize> {
        let order = self.ordered_names()?;
        if order.len() <= 1 {
            debug!("Skipping propagation: {} node(s) in order", order.len());
            return Ok(0);
        }

        let mut updated = 0;
        for name in &order {
            let Some(node) = self.nodes.get(name) else {
                continue;
            };
            if node.is_root() {
                continue;
            }

            let mut weighted_sum = 0.0;
            let mut total_weight = 0.0;
            for parent in node.parents() {
                let weight = self.weight_or_default(parent, name);
                let parent_confidence = self.nodes.get(parent).map_or(0.0, Node::confidence);
                weighted_sum += parent_confidence * weight;
                total_weight += weight;
            }
            let computed = if total_weight > 0.0 {
                weighted_sum / total_weight
            } else {
                weighted_sum
            };

            let blended = self.config.blend(node.confidence(), computed);
            if let Some(node) = self.nodes.get_mut(name) {
                node.set_confidence(blended);
                updated += 1;
            }
        }

        info!(updated, nodes = order.len(), "Propagated confidence");
        Ok(updated)
    }

    /// Run `rounds` propagation passes back to back
    ///
    /// Returns the total number of node updates.
    pub fn propagate_rounds(&mut self, rounds: usize) -> Result<usize> {
        let mut total = 0;
        for round in 0..rounds {
            debug!("Propagation round {}/{}", round + 1, rounds);
            total += self.propagate_confidence()?;
        }
        Ok(total)
    }

    /// Edge weight, falling back to the configured default on a miss
    pub(crate) fn weight_or_default(&self, parent: &str, child: &str) -> f64 {
        self.edge_weight(parent, child)
            .unwrap_or(self.config.default_edge_weight)
    }

    fn link(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.attach_child(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.attach_parent(parent);
        }
    }
}
