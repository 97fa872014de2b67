//! Display ordering and nesting depth.
//!
//! # Ordering
//!
//! [`order_for_hierarchy`] emits nodes in preorder: each root (sorted by
//! `(sortOrder, id)`), then each of its children recursively in the same
//! sort order, before the next root. A node whose parent does not resolve
//! is promoted to a root rather than dropped. Nodes that no root can reach
//! (members of a parent loop and anything hanging below one) are appended
//! at the end, sorted by `(sortOrder, id)`.
//!
//! The output is always a permutation of the input.
//!
//! # Depth
//!
//! [`build_depth_map`] assigns `0` to roots and `parent + 1` otherwise. When
//! an ascent revisits a node already on the current path, that node is fixed
//! at depth `0` (the loop is broken there) and the nodes below it on the path
//! count up from it.
//!
//! Both walks are iterative, so arbitrarily deep chains cannot overflow the
//! stack.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use super::NodeIndex;
use crate::model::Node;

/// A node paired with its nesting depth, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRow<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Order `nodes` for hierarchical display.
///
/// See the module docs for the exact rules. Runs in `O(n log n)`.
pub fn order_for_hierarchy(nodes: &[Node]) -> Vec<&Node> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let index = NodeIndex::new(nodes);
    let by_sibling_key = |a: &usize, b: &usize| nodes[*a].sibling_cmp(&nodes[*b]).then(a.cmp(b));

    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        match node.parent() {
            Some(pid) if index.contains(pid) => children.entry(pid).or_default().push(idx),
            _ => roots.push(idx),
        }
    }
    for list in children.values_mut() {
        list.sort_by(by_sibling_key);
    }
    roots.sort_by(by_sibling_key);

    let mut visited = vec![false; nodes.len()];
    let mut ordered: Vec<&Node> = Vec::with_capacity(nodes.len());

    // Children are pushed in reverse so the smallest key pops first; a
    // subtree is fully drained before the next sibling comes off the stack.
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(idx) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        let node = &nodes[idx];
        ordered.push(node);
        // Only the first node carrying an id owns its children.
        if index.position(&node.id) == Some(idx) {
            if let Some(kids) = children.get(node.id.as_str()) {
                stack.extend(kids.iter().rev().copied().filter(|k| !visited[*k]));
            }
        }
    }

    if ordered.len() < nodes.len() {
        let mut unreachable: Vec<usize> = (0..nodes.len()).filter(|i| !visited[*i]).collect();
        unreachable.sort_by(by_sibling_key);
        warn!(
            count = unreachable.len(),
            "nodes unreachable from any root (parent loop); appending"
        );
        ordered.extend(unreachable.into_iter().map(|i| &nodes[i]));
    }

    debug!(nodes = nodes.len(), "ordered hierarchy");
    ordered
}

// ---------------------------------------------------------------------------
// Depth
// ---------------------------------------------------------------------------

/// Compute the nesting depth of every node, keyed by id.
///
/// Linear in the number of nodes: each node is resolved once and memoized.
pub fn build_depth_map(nodes: &[Node]) -> HashMap<String, usize> {
    let index = NodeIndex::new(nodes);
    let mut depths: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        resolve_depth(&index, node, &mut depths);
    }

    depths
        .into_iter()
        .map(|(id, depth)| (id.to_string(), depth))
        .collect()
}

/// Resolve the depth of `start`, ascending until a memoized node, a root,
/// or a node already on the current path.
fn resolve_depth<'a>(index: &NodeIndex<'a>, start: &'a Node, depths: &mut HashMap<&'a str, usize>) {
    if depths.contains_key(start.id.as_str()) {
        return;
    }

    let mut path: Vec<&'a Node> = Vec::new();
    let mut on_path: HashSet<&'a str> = HashSet::new();
    let mut current = start;

    loop {
        path.push(current);
        on_path.insert(current.id.as_str());

        let Some(parent) = index.parent_of(current) else {
            depths.insert(current.id.as_str(), 0);
            break;
        };
        if depths.contains_key(parent.id.as_str()) {
            break;
        }
        if on_path.contains(parent.id.as_str()) {
            warn!(node = %parent.id, "parent cycle broken; treating as root");
            depths.insert(parent.id.as_str(), 0);
            break;
        }
        current = parent;
    }

    // Unwind from the top of the ascent. A node memoized during the ascent
    // (the loop breaker or the terminal root) keeps its value.
    for node in path.into_iter().rev() {
        if depths.contains_key(node.id.as_str()) {
            continue;
        }
        let parent_depth = index
            .parent_of(node)
            .and_then(|p| depths.get(p.id.as_str()).copied())
            .unwrap_or(0);
        depths.insert(node.id.as_str(), parent_depth + 1);
    }
}

/// The ordered sequence paired with depths, as a list view renders it.
pub fn display_rows(nodes: &[Node]) -> Vec<DisplayRow<'_>> {
    let depths = build_depth_map(nodes);
    order_for_hierarchy(nodes)
        .into_iter()
        .map(|node| DisplayRow {
            node,
            depth: depths.get(&node.id).copied().unwrap_or(0),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
