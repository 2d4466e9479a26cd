//! Topological order cache

use crate::Node;
use std::collections::{BTreeMap, HashSet};

/// Cached topological order
///
/// Structural mutations move the cache to `Stale`; only a successful full
/// recompute moves it back to `Fresh`.
#[derive(Debug, Clone, Default)]
pub(crate) enum OrderCache {
    /// Order must be recomputed before use
    #[default]
    Stale,
    /// Order is valid for the current structure
    Fresh(Vec<String>),
}

impl OrderCache {
    pub(crate) fn invalidate(&mut self) {
        *self = OrderCache::Stale;
    }

    pub(crate) fn is_stale(&self) -> bool {
        matches!(self, OrderCache::Stale)
    }

    pub(crate) fn order(&self) -> Option<&[String]> {
        match self {
            OrderCache::Fresh(order) => Some(order),
            OrderCache::Stale => None,
        }
    }
}

/// Outcome of a full traversal
pub(crate) struct Traversal {
    /// Reverse post-order of every node reachable from a root
    pub(crate) order: Vec<String>,
    /// First back edge found, as (from, to)
    pub(crate) back_edge: Option<(String, String)>,
}

/// Reverse post-order depth-first traversal from every root
///
/// Uses an explicit stack of (node, next child index) frames so that deep
/// chains cannot exhaust the call stack. Nodes on the current path are
/// tracked to detect back edges.
pub(crate) fn traverse(nodes: &BTreeMap<String, Node>) -> Traversal {
    let mut post_order: Vec<String> = Vec::with_capacity(nodes.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut back_edge = None;

    for (name, root) in nodes.iter().filter(|(_, node)| node.is_root()) {
        if !visited.insert(name.as_str()) {
            continue;
        }
        on_path.insert(name.as_str());
        let mut stack: Vec<(&Node, usize)> = vec![(root, 0)];

        while let Some((node, next)) = stack.last_mut() {
            let node: &Node = *node;
            if let Some(child_name) = node.children().get(*next) {
                *next += 1;
                let Some(child) = nodes.get(child_name) else {
                    continue;
                };
                if on_path.contains(child_name.as_str()) {
                    back_edge.get_or_insert_with(|| (node.name().to_string(), child_name.clone()));
                    continue;
                }
                if visited.insert(child_name.as_str()) {
                    on_path.insert(child_name.as_str());
                    stack.push((child, 0));
                }
            } else {
                on_path.remove(node.name());
                post_order.push(node.name().to_string());
                stack.pop();
            }
        }
    }

    post_order.reverse();
    Traversal {
        order: post_order,
        back_edge,
    }
}
