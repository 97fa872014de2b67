//! End-to-end walkthroughs of the documented behaviors.

use sprig_core::drag::{DragOutcome, DragSession, HighlightChange, RowBounds, Span};
use sprig_core::validate::validate_commit;
use sprig_core::{FlatList, Node, build_depth_map, order_for_hierarchy};

fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

const VIEWPORT: Span = Span::new(0.0, 600.0);
const ROW: f32 = 48.0;

/// Stack rows `ROW` tall from the top of the viewport.
fn layout(list: &FlatList) -> Vec<RowBounds> {
    list.iter()
        .zip(0_u16..)
        .map(|(n, i)| {
            let top = f32::from(i) * ROW;
            RowBounds::new(n.id.clone(), top, top + ROW)
        })
        .collect()
}

/// Dragged row bounds with its center over the middle of row `i`.
fn over_middle_of(i: u16) -> Span {
    let center = f32::from(i) * ROW + ROW / 2.0;
    Span::new(center - ROW / 2.0, center + ROW / 2.0)
}

fn drag_tree() -> FlatList {
    FlatList::new(vec![
        Node::new("P", 0),
        Node::new("C1", 0).with_parent("P"),
        Node::new("C2", 1).with_parent("P"),
        Node::new("D", 1),
    ])
}

#[test]
fn flat_list_sorts_by_sort_order() {
    let nodes = vec![Node::new("A", 2), Node::new("B", 0), Node::new("C", 1)];
    assert_eq!(ids(&order_for_hierarchy(&nodes)), vec!["B", "C", "A"]);
}

#[test]
fn orphan_ties_with_root_and_breaks_on_id() {
    let nodes = vec![
        Node::new("p", 0),
        Node::new("x", 0).with_parent("p"),
        Node::new("o", 0).with_parent("missing"),
    ];
    assert_eq!(ids(&order_for_hierarchy(&nodes)), vec!["o", "p", "x"]);
}

#[test]
fn self_parent_has_depth_zero() {
    let nodes = vec![Node::new("s", 0).with_parent("s")];
    let depths = build_depth_map(&nodes);
    assert_eq!(depths.len(), 1);
    assert_eq!(depths["s"], 0);
    assert_eq!(ids(&order_for_hierarchy(&nodes)), vec!["s"]);
}

#[test]
fn chain_depths_count_up() {
    let nodes = vec![
        Node::new("c", 0).with_parent("b"),
        Node::new("root", 0),
        Node::new("b", 0).with_parent("a"),
        Node::new("a", 0).with_parent("root"),
    ];
    let depths = build_depth_map(&nodes);
    let chain: Vec<usize> = ["root", "a", "b", "c"].iter().map(|id| depths[*id]).collect();
    assert_eq!(chain, vec![0, 1, 2, 3]);
}

#[test]
fn dropping_root_into_parent_appends_as_last_child() {
    let list = drag_tree();
    let rows = layout(&list);
    let mut session = DragSession::default();
    session.on_start(list.clone(), "D").expect("start");

    let update = session
        .on_position_update(over_middle_of(0), &rows, VIEWPORT)
        .expect("update");
    assert_eq!(update.highlight, Some(HighlightChange::Set("P".into())));

    let end = session.on_release();
    let DragOutcome::Commit { items } = end.outcome else {
        panic!("expected a commit");
    };
    assert_eq!(validate_commit(list.as_slice(), &items), Ok(()));

    let by_id = |id: &str| items.iter().find(|i| i.id == id).expect("present");
    assert_eq!(by_id("C1").sort_order, 0);
    assert_eq!(by_id("C2").sort_order, 1);
    assert_eq!(by_id("D").parent(), Some("P"));
    assert_eq!(by_id("D").sort_order, 2);
    assert!(!session.is_dragging());
}

#[test]
fn dropping_ancestor_onto_descendant_is_rejected() {
    let list = drag_tree();
    let rows = layout(&list);
    let mut session = DragSession::default();
    session.on_start(list.clone(), "P").expect("start");

    session
        .on_position_update(over_middle_of(1), &rows, VIEWPORT)
        .expect("update");
    assert_eq!(session.highlighted(), Some("C1"));

    let end = session.on_release();
    assert_eq!(end.highlight, Some(HighlightChange::Cleared));
    match end.outcome {
        DragOutcome::InvalidDrop { warning, restore } => {
            assert_eq!(warning.dragged, "P");
            assert_eq!(warning.target, "C1");
            assert_eq!(restore, list);
        }
        other => panic!("expected an invalid drop, got {other:?}"),
    }

    // the next gesture starts clean
    assert!(!session.is_dragging());
    assert_eq!(session.highlighted(), None);
    session.on_start(list, "D").expect("restart");
    assert_eq!(session.mode().map(ToString::to_string).as_deref(), Some("reorder"));
}

#[test]
fn corrupt_graph_still_orders_everything() {
    let nodes = vec![
        Node::new("a", 0).with_parent("b"),
        Node::new("b", 0).with_parent("c"),
        Node::new("c", 0).with_parent("a"),
        Node::new("s", 0).with_parent("s"),
        Node::new("o", 3).with_parent("nowhere"),
        Node::new("r", 1),
    ];
    let ordered = order_for_hierarchy(&nodes);
    assert_eq!(ordered.len(), nodes.len());
    assert_eq!(ids(&ordered[..2]), vec!["r", "o"]);
    assert_eq!(build_depth_map(&nodes).len(), nodes.len());
}
