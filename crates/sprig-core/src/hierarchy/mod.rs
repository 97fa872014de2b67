//! Parent/child structure over a flat node set.
//!
//! Every function in this module is pure and total: it accepts any finite
//! node slice, including dangling parent references, self-parents and
//! multi-node parent loops, and always terminates with a complete answer.
//!
//! ## Submodules
//!
//! - [`order`]: display ordering (preorder) and depth computation.
//! - [`cycles`]: reparent validation; the only gate that keeps a node from
//!   becoming its own ancestor.
//! - [`boundary`]: parent/first-child boundary queries over a flat list,
//!   optionally ignoring the row being dragged.
//! - [`diagnostics`]: read-only report of malformed structure.

pub mod boundary;
pub mod cycles;
pub mod diagnostics;
pub mod order;

use std::collections::HashMap;

use crate::model::Node;

/// Id lookup over a node slice.
///
/// Nodes are only ever related through this map, never through direct
/// links. When ids collide the first occurrence wins the lookup.
#[derive(Debug, Clone)]
pub struct NodeIndex<'a> {
    by_id: HashMap<&'a str, usize>,
    nodes: &'a [Node],
}

impl<'a> NodeIndex<'a> {
    #[must_use]
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            by_id.entry(node.id.as_str()).or_insert(idx);
        }
        Self { by_id, nodes }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a Node> {
        self.position(id).map(|idx| &self.nodes[idx])
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The resolved parent of `node`, or `None` for roots and dangling
    /// references.
    #[must_use]
    pub fn parent_of(&self, node: &Node) -> Option<&'a Node> {
        node.parent().and_then(|pid| self.get(pid))
    }

    /// A node is a root when it has no parent or its parent does not resolve.
    #[must_use]
    pub fn is_root(&self, node: &Node) -> bool {
        self.parent_of(node).is_none()
    }

    #[must_use]
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }
}
