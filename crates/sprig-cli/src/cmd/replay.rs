//! `sprig replay`: drive a [`DragSession`] from a scripted gesture.
//!
//! A script is a JSON object:
//!
//! ```json
//! {
//!   "nodes": [ ... ],
//!   "rowHeight": 48,
//!   "viewport": { "top": 0, "bottom": 600 },
//!   "events": [
//!     { "event": "start", "id": "d" },
//!     { "event": "position", "y": 30 },
//!     { "event": "move", "from": 3, "to": 1 },
//!     { "event": "release" }
//!   ]
//! }
//! ```
//!
//! A `position` event without `rows` lays the session's current visual order
//! out top to bottom, `rowHeight` apart, and centers the dragged row on `y`.
//! The viewport defaults to exactly the laid-out rows.
//!
//! Committed payloads are applied to the node set, so later gestures in the
//! same script start from the new structure.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};
use sprig_core::config::DragConfig;
use sprig_core::drag::{
    DragEnd, DragOutcome, DragSession, DropMode, HighlightChange, RowBounds, SessionError, Span,
};
use sprig_core::validate::validate_commit;
use sprig_core::{FlatList, Node, ReorderItem, order_for_hierarchy};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use super::order::{OrderRow, order_rows, write_rows_pretty, write_rows_text};
use super::read_json;

const fn default_row_height() -> f32 {
    48.0
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON replay script (`-` for stdin).
    pub script: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    nodes: Vec<Node>,
    #[serde(default = "default_row_height")]
    row_height: f32,
    #[serde(default)]
    viewport: Option<Span>,
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event {
    Start {
        id: String,
    },
    Position {
        y: f32,
        #[serde(default)]
        rows: Option<Vec<RowBounds>>,
    },
    Move {
        from: usize,
        to: usize,
    },
    Release,
    Cancel,
}

#[derive(Debug, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum Step {
    Started {
        id: String,
    },
    Mode {
        y: f32,
        mode: DropMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlight: Option<HighlightChange>,
    },
    Moved {
        from: usize,
        to: usize,
        applied: bool,
    },
    End {
        outcome: DragOutcome,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlight: Option<HighlightChange>,
    },
    Error {
        code: &'static str,
        message: String,
    },
}

impl From<DragEnd> for Step {
    fn from(end: DragEnd) -> Self {
        Self::End {
            outcome: end.outcome,
            highlight: end.highlight,
        }
    }
}

impl From<SessionError> for Step {
    fn from(err: SessionError) -> Self {
        Self::Error {
            code: err.code().code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    steps: Vec<Step>,
    commits: usize,
    order: Vec<OrderRow<'a>>,
}

/// Rows of `list` stacked from `y = 0`, each `row_height` tall.
fn stack_rows(list: &FlatList, row_height: f32) -> Vec<RowBounds> {
    let mut top = 0.0_f32;
    list.iter()
        .map(|node| {
            let row = RowBounds::new(node.id.clone(), top, top + row_height);
            top += row_height;
            row
        })
        .collect()
}

/// The structure as a list view would show it.
fn display_list(nodes: &[Node]) -> FlatList {
    FlatList::new(order_for_hierarchy(nodes).into_iter().cloned().collect())
}

/// Write a committed payload back onto the node set.
fn apply_commit(nodes: &mut [Node], items: &[ReorderItem]) -> anyhow::Result<()> {
    validate_commit(nodes, items).context("Session produced an invalid commit")?;
    for item in items {
        if let Some(node) = nodes.iter_mut().find(|n| n.id == item.id) {
            node.parent_id.clone_from(&item.parent_id);
            node.sort_order = i64::from(item.sort_order);
        }
    }
    Ok(())
}

struct Replayer {
    session: DragSession,
    nodes: Vec<Node>,
    row_height: f32,
    viewport: Option<Span>,
    steps: Vec<Step>,
    commits: usize,
}

impl Replayer {
    fn finish(&mut self, end: DragEnd) -> anyhow::Result<()> {
        if let Some(items) = end.outcome.commit_items() {
            apply_commit(&mut self.nodes, items)?;
            self.commits += 1;
            debug!(items = items.len(), "commit applied");
        }
        self.steps.push(end.into());
        Ok(())
    }

    fn run(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Start { id } => {
                match self.session.on_start(display_list(&self.nodes), &id) {
                    Ok(previous) => {
                        if let Some(end) = previous {
                            self.finish(end)?;
                        }
                        self.steps.push(Step::Started { id });
                    }
                    Err(err) => self.steps.push(err.into()),
                }
            }
            Event::Position { y, rows } => {
                let rows = rows.unwrap_or_else(|| {
                    self.session
                        .visual_order()
                        .map(|list| stack_rows(list, self.row_height))
                        .unwrap_or_default()
                });
                let viewport = self.viewport.unwrap_or_else(|| {
                    Span::new(0.0, rows.last().map_or(0.0, |row| row.span.bottom))
                });
                let half = self.row_height / 2.0;
                let dragged = Span::new(y - half, y + half);
                match self.session.on_position_update(dragged, &rows, viewport) {
                    Ok(update) => self.steps.push(Step::Mode {
                        y,
                        mode: update.mode,
                        highlight: update.highlight,
                    }),
                    Err(err) => self.steps.push(err.into()),
                }
            }
            Event::Move { from, to } => match self.session.on_visual_move(from, to) {
                Ok(applied) => self.steps.push(Step::Moved { from, to, applied }),
                Err(err) => self.steps.push(err.into()),
            },
            Event::Release => {
                let end = self.session.on_release();
                self.finish(end)?;
            }
            Event::Cancel => {
                let end = self.session.on_cancel();
                self.finish(end)?;
            }
        }
        Ok(())
    }
}

pub fn run_replay(args: &ReplayArgs, config: &DragConfig, output: OutputMode) -> anyhow::Result<()> {
    let script: Script = read_json(&args.script)?;
    let event_count = script.events.len();

    let mut replayer = Replayer {
        session: DragSession::new(config),
        nodes: script.nodes,
        row_height: script.row_height,
        viewport: script.viewport,
        steps: Vec::with_capacity(event_count),
        commits: 0,
    };
    for event in script.events {
        replayer.run(event)?;
    }
    if replayer.session.is_dragging() {
        debug!("script ended mid-drag; nothing committed for the open gesture");
    }
    info!(events = event_count, commits = replayer.commits, "replay finished");

    let Replayer {
        nodes,
        steps,
        commits,
        ..
    } = replayer;
    let report = ReplayReport {
        steps,
        commits,
        order: order_rows(&nodes),
    };
    render_mode(output, &report, render_text, render_pretty)
}

fn describe_outcome(outcome: &DragOutcome) -> String {
    match outcome {
        DragOutcome::Commit { items } => format!("commit {} item(s)", items.len()),
        DragOutcome::InvalidDrop { warning, .. } => format!("invalid: {warning}"),
        DragOutcome::Cancelled { .. } => "cancelled".to_string(),
        DragOutcome::Ignored => "ignored".to_string(),
    }
}

fn describe_highlight(highlight: Option<&HighlightChange>) -> String {
    match highlight {
        Some(HighlightChange::Set(id)) => format!("highlight {id}"),
        Some(HighlightChange::Cleared) => "highlight cleared".to_string(),
        None => String::new(),
    }
}

fn render_text(report: &ReplayReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for step in &report.steps {
        match step {
            Step::Started { id } => writeln!(w, "started\t{id}")?,
            Step::Mode { y, mode, highlight } => writeln!(
                w,
                "mode\t{y}\t{mode}\t{}",
                describe_highlight(highlight.as_ref())
            )?,
            Step::Moved { from, to, applied } => {
                let verdict = if *applied { "applied" } else { "ignored" };
                writeln!(w, "moved\t{from}\t{to}\t{verdict}")?;
            }
            Step::End { outcome, .. } => writeln!(w, "end\t{}", describe_outcome(outcome))?,
            Step::Error { code, message } => writeln!(w, "error\t{code}\t{message}")?,
        }
    }
    writeln!(w)?;
    write_rows_text(&report.order, w)
}

fn render_pretty(report: &ReplayReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Replay")?;
    for (i, step) in report.steps.iter().enumerate() {
        let line = match step {
            Step::Started { id } => format!("drag {id}"),
            Step::Mode { y, mode, highlight } => {
                let hl = describe_highlight(highlight.as_ref());
                if hl.is_empty() {
                    format!("y={y} → {mode}")
                } else {
                    format!("y={y} → {mode} ({hl})")
                }
            }
            Step::Moved { from, to, applied } => {
                let note = if *applied { "" } else { " (ignored)" };
                format!("move {from} → {to}{note}")
            }
            Step::End { outcome, .. } => describe_outcome(outcome),
            Step::Error { code, message } => format!("✗ [{code}] {message}"),
        };
        writeln!(w, "{:>3}. {line}", i + 1)?;
    }
    writeln!(w)?;
    pretty_kv(w, "commits", report.commits.to_string())?;
    writeln!(w)?;
    pretty_section(w, "Final order")?;
    write_rows_pretty(&report.order, w)
}
