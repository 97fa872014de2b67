//! `sprig plan`: build the commit payload for a finished drag.
//!
//! The node file is read as the final visual order, i.e. the list exactly as
//! it looks on screen when the pointer is released.

use crate::output::{OutputMode, render_mode};
use anyhow::Context;
use clap::{Args, ValueEnum};
use sprig_core::CycleCheck;
use sprig_core::drag::plan::{
    from_current_order, with_nesting, with_sibling_drop, with_unnesting,
};
use sprig_core::hierarchy::NodeIndex;
use sprig_core::hierarchy::cycles::check_reparent;
use sprig_core::validate::validate_commit;
use std::io::Write;
use std::path::PathBuf;

use super::{dash, find_node, read_nodes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanMode {
    /// Keep every parent; renumber siblings from the visual order.
    Current,
    /// Move `--dragged` under `--parent`.
    Nest,
    /// Promote `--dragged` to a root.
    Unnest,
    /// Adopt the parent of the sibling group `--dragged` sits in.
    Sibling,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// JSON file with the final visual order (`-` for stdin).
    pub nodes: PathBuf,

    /// Which payload builder to use.
    #[arg(long, value_enum, default_value_t = PlanMode::Current)]
    pub mode: PlanMode,

    /// Dragged node id (required for nest, unnest and sibling).
    #[arg(long)]
    pub dragged: Option<String>,

    /// New parent id (nest only).
    #[arg(long, required_if_eq("mode", "nest"))]
    pub parent: Option<String>,
}

fn dragged_arg(args: &PlanArgs) -> anyhow::Result<&str> {
    args.dragged
        .as_deref()
        .context("--dragged is required unless --mode is current")
}

pub fn run_plan(args: &PlanArgs, output: OutputMode) -> anyhow::Result<()> {
    let nodes = read_nodes(&args.nodes)?;

    let items = match args.mode {
        PlanMode::Current => from_current_order(&nodes),
        PlanMode::Nest => {
            let dragged = dragged_arg(args)?;
            let parent = args.parent.as_deref().context("--parent is required for --mode nest")?;
            find_node(&nodes, dragged)?;
            let target = find_node(&nodes, parent)?;
            let index = NodeIndex::new(&nodes);
            if let CycleCheck::WouldCycle(warning) = check_reparent(&index, dragged, target) {
                return Err(warning.into());
            }
            with_nesting(&nodes, dragged, parent)
        }
        PlanMode::Unnest => {
            let dragged = dragged_arg(args)?;
            find_node(&nodes, dragged)?;
            with_unnesting(&nodes, dragged)
        }
        PlanMode::Sibling => {
            let dragged = dragged_arg(args)?;
            find_node(&nodes, dragged)?;
            with_sibling_drop(&nodes, dragged)
        }
    };

    validate_commit(&nodes, &items).context("Generated payload failed validation")?;

    render_mode(
        output,
        &items,
        |items, w| {
            for item in items {
                writeln!(w, "{}\t{}\t{}", item.id, dash(item.parent()), item.sort_order)?;
            }
            Ok(())
        },
        |items, w| {
            writeln!(w, "{:<24} {:<24} SORT", "ID", "PARENT")?;
            for item in items {
                writeln!(
                    w,
                    "{:<24} {:<24} {}",
                    item.id,
                    dash(item.parent()),
                    item.sort_order
                )?;
            }
            writeln!(w, "\n{} row(s)", items.len())
        },
    )
}
