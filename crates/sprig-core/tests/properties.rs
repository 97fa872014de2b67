use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;
use sprig_core::drag::plan;
use sprig_core::hierarchy::diagnostics::diagnose;
use sprig_core::hierarchy::order::display_rows;
use sprig_core::validate::{is_dense, validate_commit};
use sprig_core::{Node, ReorderItem, build_depth_map, order_for_hierarchy, would_create_cycle};

#[path = "generators.rs"]
mod generators;
use generators::*;

fn sorted_ids<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<&'a str> {
    let mut ids: Vec<&str> = nodes.into_iter().map(|n| n.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

/// Everything reachable from `root` by following child links.
fn descendants(nodes: &[Node], root: &str) -> HashSet<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for n in nodes {
        if let Some(p) = n.parent() {
            children.entry(p).or_default().push(n.id.as_str());
        }
    }
    let mut found = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        for kid in children.get(id).into_iter().flatten() {
            if found.insert((*kid).to_string()) {
                queue.push_back(kid);
            }
        }
    }
    found
}

/// Nodes as the store would hold them after persisting `items`.
fn apply(items: &[ReorderItem]) -> Vec<Node> {
    items
        .iter()
        .map(|item| Node {
            id: item.id.clone(),
            parent_id: item.parent_id.clone(),
            sort_order: i64::from(item.sort_order),
            title: String::new(),
            completed: false,
        })
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn ordering_is_a_permutation(nodes in arb_nodes(40)) {
        let ordered = order_for_hierarchy(&nodes);
        prop_assert_eq!(ordered.len(), nodes.len());
        prop_assert_eq!(sorted_ids(ordered.iter().copied()), sorted_ids(&nodes));
    }

    #[test]
    fn ordering_ignores_input_position(
        (nodes, shuffled) in arb_nodes(30).prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a: Vec<&str> = order_for_hierarchy(&nodes).iter().map(|n| n.id.as_str()).collect();
        let b: Vec<&str> = order_for_hierarchy(&shuffled).iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn forest_parents_precede_children(nodes in arb_forest(40)) {
        let ordered = order_for_hierarchy(&nodes);
        let pos: HashMap<&str, usize> =
            ordered.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
        for n in &nodes {
            if let Some(parent_pos) = n.parent().and_then(|p| pos.get(p)) {
                prop_assert!(*parent_pos < pos[n.id.as_str()]);
            }
        }
    }

    #[test]
    fn depth_map_covers_every_node(nodes in arb_nodes(40)) {
        let depths = build_depth_map(&nodes);
        prop_assert_eq!(depths.len(), nodes.len());
        for n in &nodes {
            prop_assert!(depths[&n.id] < nodes.len().max(1));
        }
    }

    #[test]
    fn forest_depth_is_parent_plus_one(nodes in arb_forest(40)) {
        let depths = build_depth_map(&nodes);
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        for n in &nodes {
            let expected = match n.parent() {
                Some(p) if ids.contains(p) => depths[p] + 1,
                _ => 0,
            };
            prop_assert_eq!(depths[&n.id], expected);
        }
    }

    #[test]
    fn display_rows_match_order_and_depths(nodes in arb_nodes(30)) {
        let rows = display_rows(&nodes);
        let depths = build_depth_map(&nodes);
        let ordered = order_for_hierarchy(&nodes);
        prop_assert_eq!(rows.len(), ordered.len());
        for (row, node) in rows.iter().zip(ordered) {
            prop_assert_eq!(&row.node.id, &node.id);
            prop_assert_eq!(row.depth, depths[&node.id]);
        }
    }

    #[test]
    fn cycle_guard_flags_exactly_self_and_descendants(
        (nodes, d, t) in arb_nodes_with_pair(30)
    ) {
        let dragged = &nodes[d];
        let target = &nodes[t];
        let expected = d == t || descendants(&nodes, &dragged.id).contains(&target.id);
        prop_assert_eq!(would_create_cycle(dragged, target, &nodes), expected);
    }

    #[test]
    fn every_plan_is_dense_and_complete((nodes, pick) in arb_forest_with_pick(30)) {
        let list = order_for_hierarchy(&nodes).into_iter().cloned().collect::<Vec<_>>();
        let dragged = nodes[pick].id.as_str();
        let parent = nodes[0].id.as_str();

        let plans = [
            plan::from_current_order(&list),
            plan::with_nesting(&list, dragged, parent),
            plan::with_unnesting(&list, dragged),
            plan::with_sibling_drop(&list, dragged),
        ];
        for items in &plans {
            prop_assert!(is_dense(items));
            prop_assert_eq!(validate_commit(&list, items), Ok(()));
            let in_order: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
            let listed: Vec<&str> = list.iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(in_order, listed);
        }
    }

    #[test]
    fn sibling_drop_never_introduces_a_loop(
        (nodes, pick, to) in arb_forest_with_pick(30).prop_flat_map(|(nodes, pick)| {
            let len = nodes.len();
            (Just(nodes), Just(pick), 0..len)
        })
    ) {
        let mut list = sprig_core::FlatList::new(order_for_hierarchy(&nodes).into_iter().cloned().collect());
        let dragged = nodes[pick].id.clone();
        let from = list.position_of(&dragged).unwrap_or(0);
        list.move_item(from, to);

        let committed = apply(&plan::with_sibling_drop(list.as_slice(), &dragged));
        let report = diagnose(&committed);
        prop_assert!(report.cycles.is_empty());
        prop_assert!(report.self_parented.is_empty());
    }
}
