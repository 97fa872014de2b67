//! Commit payload construction.
//!
//! Every builder walks the final visual order once and hands out
//! `sortOrder` values from a per-`parentId` counter, so each sibling group
//! in the output is numbered `0..k` in the order it appears on screen,
//! whatever `sortOrder` values the nodes carried before.
//!
//! The builders differ only in which `parentId` the dragged node is emitted
//! with. [`with_sibling_drop`] infers it from the dragged node's neighbors
//! and falls back to [`from_current_order`] whenever the inference is not
//! clean.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::hierarchy::NodeIndex;
use crate::hierarchy::cycles::{CycleCheck, check_reparent};
use crate::model::{Node, ReorderItem};

/// Keep every `parentId`; renumber `sortOrder` from the visual order.
pub fn from_current_order(list: &[Node]) -> Vec<ReorderItem> {
    assign(list, None)
}

/// Like [`from_current_order`], with the dragged node moved under
/// `new_parent_id`.
///
/// No cycle check happens here. Callers run the guard first.
pub fn with_nesting(list: &[Node], dragged_id: &str, new_parent_id: &str) -> Vec<ReorderItem> {
    assign(list, Some((dragged_id, Some(new_parent_id))))
}

/// Like [`from_current_order`], with the dragged node promoted to a root.
pub fn with_unnesting(list: &[Node], dragged_id: &str) -> Vec<ReorderItem> {
    assign(list, Some((dragged_id, None)))
}

/// Reparent the dragged node into the sibling group it was dropped between,
/// when that group is unambiguous and valid.
pub fn with_sibling_drop(list: &[Node], dragged_id: &str) -> Vec<ReorderItem> {
    match infer_sibling_parent(list, dragged_id) {
        SiblingInference::Reparent(parent) => {
            debug!(dragged = dragged_id, parent = ?parent, "sibling drop reparents");
            assign(list, Some((dragged_id, parent.as_deref())))
        }
        SiblingInference::Fallback(reason) => {
            debug!(dragged = dragged_id, %reason, "sibling drop falls back to reorder");
            from_current_order(list)
        }
    }
}

/// Why a sibling drop did not reparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The dragged id is not in the list.
    NotInList,
    /// The dragged node is first or last, so it has only one neighbor.
    MissingNeighbor,
    /// The two neighbors have different parents.
    NeighborsDisagree,
    /// The neighbors' parent is already the dragged node's parent.
    ParentUnchanged,
    /// The neighbors' parent id does not name any node.
    UnresolvedParent,
    /// The neighbors' parent is the dragged node or one of its descendants.
    WouldCycle,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotInList => "dragged node not in list",
            Self::MissingNeighbor => "missing neighbor",
            Self::NeighborsDisagree => "neighbors have different parents",
            Self::ParentUnchanged => "parent unchanged",
            Self::UnresolvedParent => "inferred parent does not exist",
            Self::WouldCycle => "inferred parent would create a cycle",
        };
        f.write_str(text)
    }
}

/// Result of reading intent from a drop between two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingInference {
    /// Move the dragged node under this parent (`None` = root).
    Reparent(Option<String>),
    Fallback(FallbackReason),
}

pub fn infer_sibling_parent(list: &[Node], dragged_id: &str) -> SiblingInference {
    use SiblingInference::Fallback;

    let Some(pos) = list.iter().position(|n| n.id == dragged_id) else {
        return Fallback(FallbackReason::NotInList);
    };
    let dragged = &list[pos];
    let (Some(prev), Some(next)) = (pos.checked_sub(1).and_then(|i| list.get(i)), list.get(pos + 1))
    else {
        return Fallback(FallbackReason::MissingNeighbor);
    };
    if prev.parent() != next.parent() {
        return Fallback(FallbackReason::NeighborsDisagree);
    }

    let inferred = prev.parent();
    if inferred == dragged.parent() {
        return Fallback(FallbackReason::ParentUnchanged);
    }

    let Some(parent_id) = inferred else {
        return SiblingInference::Reparent(None);
    };
    let index = NodeIndex::new(list);
    let Some(parent) = index.get(parent_id) else {
        return Fallback(FallbackReason::UnresolvedParent);
    };
    match check_reparent(&index, dragged_id, parent) {
        CycleCheck::Allowed => SiblingInference::Reparent(Some(parent_id.to_string())),
        CycleCheck::WouldCycle(_) => Fallback(FallbackReason::WouldCycle),
    }
}

/// One pass over `list`, optionally overriding the dragged node's parent.
fn assign(list: &[Node], reparent: Option<(&str, Option<&str>)>) -> Vec<ReorderItem> {
    let mut next_slot: HashMap<Option<&str>, u32> = HashMap::new();
    let mut items = Vec::with_capacity(list.len());

    for node in list {
        let parent = match reparent {
            Some((dragged_id, new_parent)) if node.id == dragged_id => new_parent,
            _ => node.parent(),
        };
        let slot = next_slot.entry(parent).or_insert(0);
        items.push(ReorderItem {
            id: node.id.clone(),
            parent_id: parent.map(str::to_string),
            sort_order: *slot,
        });
        *slot += 1;
    }

    debug!(items = items.len(), groups = next_slot.len(), "reorder plan built");
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, sort: i64) -> Node {
        let n = Node::new(id, sort);
        match parent {
            Some(p) => n.with_parent(p),
            None => n,
        }
    }

    fn triples(items: &[ReorderItem]) -> Vec<(&str, Option<&str>, u32)> {
        items
            .iter()
            .map(|i| (i.id.as_str(), i.parent(), i.sort_order))
            .collect()
    }

    #[test]
    fn current_order_renumbers_per_group() {
        let list = vec![
            node("a", None, 7),
            node("c1", Some("a"), 3),
            node("b", None, 0),
            node("c2", Some("a"), 3),
        ];
        assert_eq!(
            triples(&from_current_order(&list)),
            vec![
                ("a", None, 0),
                ("c1", Some("a"), 0),
                ("b", None, 1),
                ("c2", Some("a"), 1),
            ]
        );
    }

    #[test]
    fn empty_list_plans_nothing() {
        assert!(from_current_order(&[]).is_empty());
        assert!(with_sibling_drop(&[], "x").is_empty());
    }

    #[test]
    fn nesting_appends_after_existing_children() {
        let list = vec![
            node("p", None, 0),
            node("c1", Some("p"), 0),
            node("c2", Some("p"), 1),
            node("d", None, 1),
        ];
        assert_eq!(
            triples(&with_nesting(&list, "d", "p")),
            vec![
                ("p", None, 0),
                ("c1", Some("p"), 0),
                ("c2", Some("p"), 1),
                ("d", Some("p"), 2),
            ]
        );
    }

    #[test]
    fn unnesting_moves_to_root_group() {
        let list = vec![node("p", None, 0), node("c", Some("p"), 0), node("r", None, 1)];
        assert_eq!(
            triples(&with_unnesting(&list, "c")),
            vec![("p", None, 0), ("c", None, 1), ("r", None, 2)]
        );
    }

    #[test]
    fn unknown_dragged_id_leaves_parents() {
        let list = vec![node("p", None, 0), node("c", Some("p"), 0)];
        assert_eq!(with_unnesting(&list, "zzz"), from_current_order(&list));
    }

    #[test]
    fn sibling_drop_between_children_reparents() {
        let list = vec![
            node("p", None, 0),
            node("c1", Some("p"), 0),
            node("d", None, 1),
            node("c2", Some("p"), 1),
        ];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Reparent(Some("p".into()))
        );
        assert_eq!(
            triples(&with_sibling_drop(&list, "d")),
            vec![
                ("p", None, 0),
                ("c1", Some("p"), 0),
                ("d", Some("p"), 1),
                ("c2", Some("p"), 2),
            ]
        );
    }

    #[test]
    fn sibling_drop_between_roots_unnests() {
        let list = vec![
            node("p", None, 0),
            node("c", Some("p"), 0),
            node("r1", None, 1),
            node("x", Some("p"), 1),
            node("r2", None, 2),
        ];
        assert_eq!(infer_sibling_parent(&list, "x"), SiblingInference::Reparent(None));
        let items = with_sibling_drop(&list, "x");
        assert_eq!(items[3].parent(), None);
        assert_eq!(items[3].sort_order, 2);
    }

    #[test]
    fn sibling_drop_with_disagreeing_neighbors_falls_back() {
        let list = vec![node("p", None, 0), node("d", None, 1), node("c", Some("p"), 0)];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Fallback(FallbackReason::NeighborsDisagree)
        );
        assert_eq!(with_sibling_drop(&list, "d"), from_current_order(&list));
    }

    #[test]
    fn sibling_drop_at_edges_falls_back() {
        let list = vec![node("d", None, 0), node("a", None, 1)];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Fallback(FallbackReason::MissingNeighbor)
        );
        assert_eq!(
            infer_sibling_parent(&list, "a"),
            SiblingInference::Fallback(FallbackReason::MissingNeighbor)
        );
    }

    #[test]
    fn sibling_drop_with_same_parent_falls_back() {
        let list = vec![node("a", None, 0), node("d", None, 1), node("b", None, 2)];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Fallback(FallbackReason::ParentUnchanged)
        );
    }

    #[test]
    fn sibling_drop_with_dangling_parent_falls_back() {
        let list = vec![
            node("a", Some("gone"), 0),
            node("d", None, 0),
            node("b", Some("gone"), 1),
        ];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Fallback(FallbackReason::UnresolvedParent)
        );
        assert_eq!(with_sibling_drop(&list, "d"), from_current_order(&list));
    }

    #[test]
    fn sibling_drop_into_own_subtree_falls_back() {
        // d's children sit on both sides of it after a visual move
        let list = vec![
            node("g1", Some("d"), 0),
            node("d", None, 0),
            node("g2", Some("d"), 1),
        ];
        assert_eq!(
            infer_sibling_parent(&list, "d"),
            SiblingInference::Fallback(FallbackReason::WouldCycle)
        );
        assert_eq!(with_sibling_drop(&list, "d"), from_current_order(&list));
    }

    #[test]
    fn sibling_drop_unknown_id_falls_back() {
        let list = vec![node("a", None, 0)];
        assert_eq!(
            infer_sibling_parent(&list, "nope"),
            SiblingInference::Fallback(FallbackReason::NotInList)
        );
    }
}
