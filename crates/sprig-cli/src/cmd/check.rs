//! `sprig check`: report malformed parent structure without changing it.
//!
//! Always exits 0: every defect reported here is one the engine repairs on
//! read.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use sprig_core::hierarchy::diagnostics::{GraphReport, diagnose};
use std::io::Write;
use std::path::PathBuf;

use super::read_nodes;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON file with an array of nodes (`-` for stdin).
    pub nodes: PathBuf,
}

pub fn run_check(args: &CheckArgs, output: OutputMode) -> anyhow::Result<()> {
    let nodes = read_nodes(&args.nodes)?;
    let report = diagnose(&nodes);
    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &GraphReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "nodes\t{}", report.node_count)?;
    writeln!(w, "roots\t{}", report.root_count)?;
    for d in &report.dangling {
        writeln!(w, "dangling\t{}\t{}", d.id, d.parent_id)?;
    }
    for id in &report.self_parented {
        writeln!(w, "self_parent\t{id}")?;
    }
    for cycle in &report.cycles {
        writeln!(w, "cycle\t{}", cycle.join(","))?;
    }
    for id in &report.duplicate_ids {
        writeln!(w, "duplicate\t{id}")?;
    }
    Ok(())
}

fn render_pretty(report: &GraphReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Hierarchy check")?;
    pretty_kv(w, "nodes", report.node_count.to_string())?;
    pretty_kv(w, "roots", report.root_count.to_string())?;

    if report.is_clean() {
        writeln!(w, "\n✓ no structural problems")?;
        return Ok(());
    }

    if !report.dangling.is_empty() {
        writeln!(w, "\nDangling parents (shown as roots):")?;
        for d in &report.dangling {
            writeln!(w, "  {} → {} (missing)", d.id, d.parent_id)?;
        }
    }
    if !report.self_parented.is_empty() {
        writeln!(w, "\nSelf-parented:")?;
        for id in &report.self_parented {
            writeln!(w, "  {id}")?;
        }
    }
    if !report.cycles.is_empty() {
        writeln!(w, "\nParent loops:")?;
        for cycle in &report.cycles {
            writeln!(w, "  {}", cycle.join(" ↔ "))?;
        }
    }
    if !report.duplicate_ids.is_empty() {
        writeln!(w, "\nDuplicate ids (first occurrence wins):")?;
        for id in &report.duplicate_ids {
            writeln!(w, "  {id}")?;
        }
    }
    writeln!(w, "\n{} node(s) affected", report.issue_count())
}
