//! Parent/first-child boundary queries over a flat list.
//!
//! A *boundary* is the seam between a parent row and the row of its first
//! child directly beneath it. Hosts use these queries to give gap semantics
//! to a drop ("the pointer is between `P` and `P`'s first child").
//!
//! Positions passed in are always indices into the **unfiltered** list. The
//! `*_excluding` forms answer as if one row (normally the dragged row, whose
//! slot is only temporarily occupied) were not there. An [`ExclusionContext`]
//! precomputes that remapping once so repeated queries during a drag cost
//! `O(1)` each.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::HashMap;

use crate::model::Node;

/// A view of a flat list with at most one row removed and positions remapped.
#[derive(Debug, Clone)]
pub struct ExclusionContext<'a> {
    visible: Vec<&'a Node>,
    /// Original position → position in `visible` (`None` for the excluded row).
    remap: Vec<Option<usize>>,
    by_id: HashMap<&'a str, usize>,
}

impl<'a> ExclusionContext<'a> {
    /// Build a view of `list` without the row whose id is `excluded_id`.
    ///
    /// An `excluded_id` that is absent from `list` (or `None`) leaves every
    /// position unchanged.
    pub fn new(list: &'a [Node], excluded_id: Option<&str>) -> Self {
        let mut visible = Vec::with_capacity(list.len());
        let mut remap = Vec::with_capacity(list.len());
        let mut by_id = HashMap::with_capacity(list.len());

        for node in list {
            if Some(node.id.as_str()) == excluded_id {
                remap.push(None);
                continue;
            }
            let pos = visible.len();
            remap.push(Some(pos));
            by_id.entry(node.id.as_str()).or_insert(pos);
            visible.push(node);
        }

        Self {
            visible,
            remap,
            by_id,
        }
    }

    /// Rows left after exclusion, in order.
    pub fn visible(&self) -> &[&'a Node] {
        &self.visible
    }

    fn visible_position(&self, original: usize) -> Option<usize> {
        self.remap.get(original).copied().flatten()
    }

    /// If the row at `child_position` is the first child directly beneath its
    /// parent row, return that parent's id.
    pub fn parent_for_first_child(&self, child_position: usize) -> Option<&'a str> {
        let pos = self.visible_position(child_position)?;
        let child = self.visible[pos];
        let parent_id = child.parent()?;
        let above = *self.visible.get(pos.checked_sub(1)?)?;
        (above.id == parent_id).then_some(above.id.as_str())
    }

    /// If the row at `target_position` is directly followed by one of its own
    /// children, return the target's id.
    pub fn parent_for_trailing_edge(&self, target_position: usize) -> Option<&'a str> {
        let pos = self.visible_position(target_position)?;
        let target = self.visible[pos];
        let below = *self.visible.get(pos + 1)?;
        (below.parent() == Some(target.id.as_str())).then_some(target.id.as_str())
    }

    /// If `lower_id` sits directly beneath `upper_id` and is its child,
    /// return `upper_id`.
    pub fn parent_for_gap(&self, upper_id: &str, lower_id: &str) -> Option<&'a str> {
        let upper_pos = *self.by_id.get(upper_id)?;
        let lower_pos = *self.by_id.get(lower_id)?;
        if lower_pos != upper_pos + 1 {
            return None;
        }
        let upper = self.visible[upper_pos];
        let lower = self.visible[lower_pos];
        (lower.parent() == Some(upper.id.as_str())).then_some(upper.id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Convenience forms
// ---------------------------------------------------------------------------

pub fn parent_id_for_first_child(list: &[Node], child_position: usize) -> Option<&str> {
    ExclusionContext::new(list, None).parent_for_first_child(child_position)
}

pub fn parent_id_for_trailing_edge(list: &[Node], target_position: usize) -> Option<&str> {
    ExclusionContext::new(list, None).parent_for_trailing_edge(target_position)
}

pub fn parent_id_for_first_child_excluding<'a>(
    list: &'a [Node],
    child_position: usize,
    excluded_id: &str,
) -> Option<&'a str> {
    ExclusionContext::new(list, Some(excluded_id)).parent_for_first_child(child_position)
}

pub fn parent_id_for_trailing_edge_excluding<'a>(
    list: &'a [Node],
    target_position: usize,
    excluded_id: &str,
) -> Option<&'a str> {
    ExclusionContext::new(list, Some(excluded_id)).parent_for_trailing_edge(target_position)
}

pub fn parent_id_for_gap_excluding<'a>(
    list: &'a [Node],
    upper_id: &str,
    lower_id: &str,
    excluded_id: Option<&str>,
) -> Option<&'a str> {
    ExclusionContext::new(list, excluded_id).parent_for_gap(upper_id, lower_id)
}
