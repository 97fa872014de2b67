//! `sprig order`: print nodes in hierarchical display order.

use crate::output::{OutputMode, render_mode};
use clap::Args;
use serde::Serialize;
use sprig_core::Node;
use sprig_core::hierarchy::order::{DisplayRow, display_rows};
use std::io::{self, Write};
use std::path::PathBuf;

use super::{dash, read_nodes};

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// JSON file with an array of nodes (`-` for stdin).
    pub nodes: PathBuf,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderRow<'a> {
    #[serde(flatten)]
    node: &'a Node,
    depth: usize,
}

impl<'a> From<DisplayRow<'a>> for OrderRow<'a> {
    fn from(row: DisplayRow<'a>) -> Self {
        Self {
            node: row.node,
            depth: row.depth,
        }
    }
}

pub(super) fn order_rows(nodes: &[Node]) -> Vec<OrderRow<'_>> {
    display_rows(nodes).into_iter().map(OrderRow::from).collect()
}

/// `depth<TAB>id<TAB>parent<TAB>sortOrder`, one row per line.
pub(super) fn write_rows_text(rows: &[OrderRow<'_>], w: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            row.depth,
            row.node.id,
            dash(row.node.parent()),
            row.node.sort_order
        )?;
    }
    Ok(())
}

/// An indented checklist.
pub(super) fn write_rows_pretty(rows: &[OrderRow<'_>], w: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        let mark = if row.node.completed { "[x]" } else { "[ ]" };
        let indent = "  ".repeat(row.depth);
        if row.node.title.is_empty() {
            writeln!(w, "{indent}{mark} {}", row.node.id)?;
        } else {
            writeln!(w, "{indent}{mark} {}  ({})", row.node.title, row.node.id)?;
        }
    }
    Ok(())
}

pub fn run_order(args: &OrderArgs, output: OutputMode) -> anyhow::Result<()> {
    let nodes = read_nodes(&args.nodes)?;
    let rows = order_rows(&nodes);
    render_mode(
        output,
        &rows,
        |rows, w| write_rows_text(rows, w),
        |rows, w| write_rows_pretty(rows, w),
    )
}
