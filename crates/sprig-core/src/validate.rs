//! Pre-hand-off checks for a commit payload.
//!
//! The persistence layer replaces the whole structure with what it is
//! given, so a payload must name every current node exactly once and carry
//! dense, zero-based `sortOrder` values in each sibling group.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::error::ErrorCode;
use crate::model::{Node, ReorderItem};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("payload has {got} items but the list has {expected} nodes")]
    LengthMismatch { expected: usize, got: usize },
    #[error("payload names unknown node '{0}'")]
    UnknownId(String),
    #[error("payload names node '{0}' more than once")]
    DuplicateId(String),
    #[error("sibling group under {parent} is not numbered 0..{len}: {orders:?}")]
    NotDense {
        parent: String,
        len: usize,
        orders: Vec<u32>,
    },
}

impl CommitError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::LengthMismatch { .. } => ErrorCode::CommitLengthMismatch,
            Self::UnknownId(_) => ErrorCode::CommitUnknownId,
            Self::DuplicateId(_) => ErrorCode::CommitDuplicateId,
            Self::NotDense { .. } => ErrorCode::CommitNotDense,
        }
    }
}

/// Check `items` is a complete, dense restructuring of `current`.
///
/// # Errors
///
/// Returns the first problem found, checking length, then ids, then
/// per-group density.
pub fn validate_commit(current: &[Node], items: &[ReorderItem]) -> Result<(), CommitError> {
    if current.len() != items.len() {
        return Err(CommitError::LengthMismatch {
            expected: current.len(),
            got: items.len(),
        });
    }

    let known: HashSet<&str> = current.iter().map(|n| n.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    for item in items {
        if !known.contains(item.id.as_str()) {
            return Err(CommitError::UnknownId(item.id.clone()));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(CommitError::DuplicateId(item.id.clone()));
        }
    }

    for (parent, orders) in sorted_groups(items) {
        if !is_zero_based_run(&orders) {
            return Err(CommitError::NotDense {
                parent: parent.map_or_else(|| "root".to_string(), |p| format!("'{p}'")),
                len: orders.len(),
                orders,
            });
        }
    }

    Ok(())
}

/// Density check alone, for payloads with no list to compare against.
#[must_use]
pub fn is_dense(items: &[ReorderItem]) -> bool {
    sorted_groups(items)
        .values()
        .all(|orders| is_zero_based_run(orders))
}

fn sorted_groups(items: &[ReorderItem]) -> BTreeMap<Option<&str>, Vec<u32>> {
    let mut groups: BTreeMap<Option<&str>, Vec<u32>> = BTreeMap::new();
    for item in items {
        groups.entry(item.parent()).or_default().push(item.sort_order);
    }
    for orders in groups.values_mut() {
        orders.sort_unstable();
    }
    groups
}

fn is_zero_based_run(sorted: &[u32]) -> bool {
    sorted.iter().zip(0_u32..).all(|(order, expected)| *order == expected)
}
