//! The visually ordered row sequence held by the UI.
//!
//! A [`FlatList`] is a scratch order: during a drag it is rearranged live for
//! feedback, and on release it becomes the input from which the committed
//! structure is derived. It carries no structural authority of its own;
//! `parentId` and `sortOrder` on the contained nodes are untouched by moves.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use super::node::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatList {
    rows: Vec<Node>,
}

impl FlatList {
    pub fn new(rows: Vec<Node>) -> Self {
        Self { rows }
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Node> {
        self.rows.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.rows.iter()
    }

    /// Position of the row with `id`, if present.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|n| n.id == id)
    }

    /// Row with `id`, if present.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.rows.iter().find(|n| n.id == id)
    }

    /// Move the row at `from` so it ends up at `to`.
    ///
    /// A no-op when `from == to` or either index is out of range. Returns
    /// `true` if the order changed.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.rows.len() || to >= self.rows.len() {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        true
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.rows
    }
}

impl From<Vec<Node>> for FlatList {
    fn from(rows: Vec<Node>) -> Self {
        Self::new(rows)
    }
}

impl<'a> IntoIterator for &'a FlatList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
