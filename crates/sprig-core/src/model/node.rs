//! Todo nodes and committed reorder records.
//!
//! A [`Node`] links to its parent only by id. Nothing here holds a reference
//! to another node, so a corrupt `parentId` chain (dangling, self-parent,
//! multi-node loop) is just data and can never become a reference cycle.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single todo item as held by the host.
///
/// `sort_order` is whatever the store last wrote. It is intended to be dense
/// and zero-based within a sibling group, but nothing on the read path relies
/// on that: ordering always falls back to the id for ties and tolerates gaps
/// or negative values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Node {
    /// Create a root node with an empty title.
    pub fn new(id: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            sort_order,
            title: String::new(),
            completed: false,
        }
    }

    /// Builder-style parent assignment.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Builder-style title assignment.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The parent id as a borrowed `&str`.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Returns `true` if the node names itself as its parent.
    pub fn is_self_parented(&self) -> bool {
        self.parent() == Some(self.id.as_str())
    }

    /// Sibling sort key: `(sort_order, id)` ascending.
    pub fn sibling_cmp(&self, other: &Self) -> Ordering {
        self.sort_order
            .cmp(&other.sort_order)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.id, self.title)
        }
    }
}

/// One row of a committed structure: the proposed `parentId` and dense
/// `sortOrder` for a node.
///
/// A `Vec<ReorderItem>` is the immutable payload handed to the persistence
/// collaborator. The engine never acts on it after producing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: String,
    pub parent_id: Option<String>,
    pub sort_order: u32,
}

impl ReorderItem {
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}
