//! `sprig cycle`: ask whether nesting one node under another is allowed.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use serde::Serialize;
use sprig_core::CycleCheck;
use sprig_core::hierarchy::NodeIndex;
use sprig_core::hierarchy::cycles::check_reparent;
use std::io::Write;
use std::path::PathBuf;

use super::{find_node, read_nodes};

#[derive(Args, Debug)]
pub struct CycleArgs {
    /// JSON file with an array of nodes (`-` for stdin).
    pub nodes: PathBuf,

    /// Node being dragged.
    pub dragged: String,

    /// Proposed new parent.
    pub target: String,
}

#[derive(Debug, Serialize)]
struct CycleReport {
    dragged: String,
    target: String,
    allowed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Exits 0 whether or not the nest is allowed; the verdict is data.
pub fn run_cycle(args: &CycleArgs, output: OutputMode) -> anyhow::Result<()> {
    let nodes = read_nodes(&args.nodes)?;
    find_node(&nodes, &args.dragged)?;
    let target = find_node(&nodes, &args.target)?;

    let index = NodeIndex::new(&nodes);
    let report = match check_reparent(&index, &args.dragged, target) {
        CycleCheck::Allowed => CycleReport {
            dragged: args.dragged.clone(),
            target: args.target.clone(),
            allowed: true,
            path: Vec::new(),
            message: None,
        },
        CycleCheck::WouldCycle(warning) => CycleReport {
            message: Some(warning.to_string()),
            dragged: warning.dragged,
            target: warning.target,
            allowed: false,
            path: warning.path,
        },
    };

    render_mode(
        output,
        &report,
        |r, w| {
            let verdict = if r.allowed { "allowed" } else { "cycle" };
            writeln!(w, "{verdict}\t{}\t{}\t{}", r.dragged, r.target, r.path.join(","))
        },
        |r, w| {
            pretty_section(w, &format!("Nest {} under {}", r.dragged, r.target))?;
            if r.allowed {
                writeln!(w, "✓ allowed")
            } else {
                pretty_kv(w, "verdict", "✗ would create a cycle")?;
                pretty_kv(w, "path", r.path.join(" → "))?;
                if let Some(msg) = &r.message {
                    pretty_kv(w, "detail", msg)?;
                }
                Ok(())
            }
        },
    )
}
