//! Read-only report of malformed parent structure.
//!
//! The engine repairs malformed data on the fly (dangling parents become
//! roots, loops are broken at their first revisit). This module only
//! describes what it would have to repair, so hosts can surface it or log it.
//! Nothing here mutates or reorders nodes.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex as GraphIndex};
use serde::Serialize;

use super::NodeIndex;
use crate::model::Node;

/// A node whose `parentId` does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingParent {
    pub id: String,
    pub parent_id: String,
}

/// Everything unusual about a node set's parent links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    pub node_count: usize,
    pub root_count: usize,
    pub dangling: Vec<DanglingParent>,
    pub self_parented: Vec<String>,
    /// Parent loops of two or more nodes, each sorted by id.
    pub cycles: Vec<Vec<String>>,
    pub duplicate_ids: Vec<String>,
}

impl GraphReport {
    /// Returns `true` if no repair would be needed.
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.self_parented.is_empty()
            && self.cycles.is_empty()
            && self.duplicate_ids.is_empty()
    }

    /// Total number of nodes affected by some defect.
    pub fn issue_count(&self) -> usize {
        self.dangling.len()
            + self.self_parented.len()
            + self.cycles.iter().map(Vec::len).sum::<usize>()
            + self.duplicate_ids.len()
    }
}

/// Inspect `nodes` and describe every structural defect.
pub fn diagnose(nodes: &[Node]) -> GraphReport {
    let index = NodeIndex::new(nodes);
    let mut report = GraphReport {
        node_count: nodes.len(),
        ..GraphReport::default()
    };

    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        *seen_ids.entry(node.id.as_str()).or_default() += 1;
    }
    let duplicates: BTreeSet<&str> = seen_ids
        .iter()
        .filter_map(|(id, count)| (*count > 1).then_some(*id))
        .collect();
    report.duplicate_ids = duplicates.into_iter().map(str::to_string).collect();

    // Edge direction: child -> parent. Self-parents are reported on their
    // own and kept out of the graph so they do not show up as 1-node SCCs.
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut graph_index: HashMap<&str, GraphIndex> = HashMap::new();
    for node in nodes {
        graph_index
            .entry(node.id.as_str())
            .or_insert_with(|| graph.add_node(node.id.as_str()));
    }

    for node in nodes {
        match node.parent() {
            None => report.root_count += 1,
            Some(pid) if !index.contains(pid) => {
                report.root_count += 1;
                report.dangling.push(DanglingParent {
                    id: node.id.clone(),
                    parent_id: pid.to_string(),
                });
            }
            Some(pid) if pid == node.id => report.self_parented.push(node.id.clone()),
            Some(pid) => {
                if let (Some(&from), Some(&to)) =
                    (graph_index.get(node.id.as_str()), graph_index.get(pid))
                {
                    graph.update_edge(from, to, ());
                }
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut members: Vec<String> = scc.iter().map(|ix| graph[*ix].to_string()).collect();
            members.sort_unstable();
            members
        })
        .collect();
    cycles.sort();
    report.cycles = cycles;

    report.dangling.sort_by(|a, b| a.id.cmp(&b.id));
    report.self_parented.sort_unstable();
    report
}
