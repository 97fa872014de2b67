//! Reparent validation.
//!
//! # Overview
//!
//! Nesting `dragged` under `target` is only safe when `target` is not
//! `dragged` itself and not one of its descendants. Equivalently: walking
//! `target`'s ancestor chain upward must never reach `dragged`.
//!
//! # Design
//!
//! - **Ancestor walk**: cost is `O(depth of target)`; the subtree of
//!   `dragged` is never enumerated.
//! - **Loop-safe**: stored data may already contain a parent loop that does
//!   not involve `dragged`. The walk remembers every id it has passed and
//!   stops at the first repeat, so it always terminates.
//! - **Value, not error**: the verdict is a [`CycleCheck`]; callers branch on
//!   it exhaustively.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::NodeIndex;
use crate::model::Node;

// ---------------------------------------------------------------------------
// CycleCheck
// ---------------------------------------------------------------------------

/// Details of a rejected reparent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleWarning {
    /// The node that would be moved.
    pub dragged: String,
    /// The proposed new parent.
    pub target: String,
    /// Ancestor chain from `target` up to and including `dragged`.
    ///
    /// For a self-drop this is `[dragged]`.
    pub path: Vec<String>,
}

impl CycleWarning {
    /// Returns `true` if the node was dropped onto itself.
    pub fn is_self_drop(&self) -> bool {
        self.dragged == self.target
    }
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_drop() {
            write!(f, "cannot nest '{}' under itself", self.dragged)
        } else {
            write!(
                f,
                "nesting '{}' under '{}' would create a cycle: {}",
                self.dragged,
                self.target,
                self.path.join(" → ")
            )
        }
    }
}

impl std::error::Error for CycleWarning {}

/// Outcome of a reparent check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleCheck {
    /// The reparent keeps the tree acyclic.
    Allowed,
    /// The target is the dragged node or one of its descendants.
    WouldCycle(CycleWarning),
}

impl CycleCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

// ---------------------------------------------------------------------------
// Core checks
// ---------------------------------------------------------------------------

/// Would making `dragged` a child of `target` create a cycle?
///
/// True iff `target` is `dragged` or a descendant of `dragged`.
pub fn would_create_cycle(dragged: &Node, target: &Node, all_nodes: &[Node]) -> bool {
    let index = NodeIndex::new(all_nodes);
    !check_reparent(&index, &dragged.id, target).is_allowed()
}

/// Walk `target`'s ancestor chain looking for `dragged_id`.
///
/// `target` is taken as a node rather than an id so the walk starts from
/// exactly the row the caller resolved, even when ids collide.
pub fn check_reparent(index: &NodeIndex<'_>, dragged_id: &str, target: &Node) -> CycleCheck {
    let mut path: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = Some(target);

    while let Some(node) = current {
        path.push(node.id.clone());
        if node.id == dragged_id {
            debug!(dragged = dragged_id, target = %target.id, "reparent rejected: cycle");
            return CycleCheck::WouldCycle(CycleWarning {
                dragged: dragged_id.to_string(),
                target: target.id.clone(),
                path,
            });
        }
        if !seen.insert(node.id.as_str()) {
            break; // pre-existing loop not involving dragged
        }
        current = index.parent_of(node);
    }

    CycleCheck::Allowed
}

/// The ancestor chain of `node`, immediate parent first.
///
/// Dangling references end the chain. A pre-existing loop truncates it at
/// the first repeat.
pub fn ancestors<'a>(index: &NodeIndex<'a>, node: &Node) -> Vec<&'a Node> {
    let mut chain: Vec<&'a Node> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(node.id.as_str());

    let mut current = index.parent_of(node);
    while let Some(parent) = current {
        if !seen.insert(parent.id.as_str()) {
            break; // cycle guard
        }
        chain.push(parent);
        current = index.parent_of(parent);
    }
    chain
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
