#![allow(dead_code)]

use proptest::prelude::*;
use sprig_core::Node;

#[derive(Debug, Clone, Copy)]
pub enum ParentChoice {
    Root,
    /// Index into the generated set, reduced modulo its length.
    Node(usize),
    Dangling,
}

pub fn arb_parent_choice() -> impl Strategy<Value = ParentChoice> + Clone {
    prop_oneof![
        2 => Just(ParentChoice::Root),
        5 => any::<usize>().prop_map(ParentChoice::Node),
        1 => Just(ParentChoice::Dangling),
    ]
}

fn build(specs: Vec<(ParentChoice, i64)>, acyclic: bool) -> Vec<Node> {
    let len = specs.len();
    specs
        .into_iter()
        .enumerate()
        .map(|(i, (choice, sort))| {
            let node = Node::new(format!("n{i}"), sort);
            match choice {
                ParentChoice::Root => node,
                ParentChoice::Dangling => node.with_parent(format!("gone{i}")),
                // Acyclic sets only point at earlier nodes.
                ParentChoice::Node(_) if acyclic && i == 0 => node,
                ParentChoice::Node(k) if acyclic => node.with_parent(format!("n{}", k % i)),
                ParentChoice::Node(k) => node.with_parent(format!("n{}", k % len)),
            }
        })
        .collect()
}

/// Unique ids; parents may be missing, self-referencing or looped.
pub fn arb_nodes(max: usize) -> impl Strategy<Value = Vec<Node>> + Clone {
    prop::collection::vec((arb_parent_choice(), -2_i64..5), 0..max)
        .prop_map(|specs| build(specs, false))
}

/// Unique ids; every parent chain ends at a root or a dangling reference.
pub fn arb_forest(max: usize) -> impl Strategy<Value = Vec<Node>> + Clone {
    prop::collection::vec((arb_parent_choice(), -2_i64..5), 0..max)
        .prop_map(|specs| build(specs, true))
}

/// A non-empty node set plus two positions into it.
pub fn arb_nodes_with_pair(max: usize) -> impl Strategy<Value = (Vec<Node>, usize, usize)> {
    prop::collection::vec((arb_parent_choice(), -2_i64..5), 1..max).prop_flat_map(|specs| {
        let len = specs.len();
        (Just(build(specs, false)), 0..len, 0..len)
    })
}

/// A non-empty forest plus one position into it.
pub fn arb_forest_with_pick(max: usize) -> impl Strategy<Value = (Vec<Node>, usize)> {
    prop::collection::vec((arb_parent_choice(), -2_i64..5), 1..max).prop_flat_map(|specs| {
        let len = specs.len();
        (Just(build(specs, true)), 0..len)
    })
}
