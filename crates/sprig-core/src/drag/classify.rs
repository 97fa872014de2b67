//! Drop-intent classification.
//!
//! # Overview
//!
//! Every pointer-position update during a drag is turned into a [`DropMode`]:
//!
//! - pointer inside another row's **nest zone** (a fractional band of the
//!   row's height, middle half by default) → [`DropMode::Nest`] under that row;
//! - pointer inside another row but outside the band → [`DropMode::Reorder`];
//! - pointer over no row and within `edge_threshold` of the viewport's top
//!   or bottom → [`DropMode::Unnest`];
//! - anything else → [`DropMode::Reorder`].
//!
//! Classification scans only the rendered rows, so it costs
//! `O(visible rows)` regardless of how many nodes exist.
//!
//! The one piece of state, which row is currently highlighted as a nest
//! target, lives in [`HighlightTracker`]. It reports a change only when the
//! highlighted row actually differs from the previous update.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::geometry::DropProbe;

// ---------------------------------------------------------------------------
// DropMode
// ---------------------------------------------------------------------------

/// What releasing the drag right now would do.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DropMode {
    /// Reorder within the current sibling group.
    #[default]
    Reorder,
    /// Reparent under `target`.
    Nest { target: String },
    /// Promote to a root.
    Unnest,
}

impl DropMode {
    pub const fn kind(&self) -> DropKind {
        match self {
            Self::Reorder => DropKind::Reorder,
            Self::Nest { .. } => DropKind::Nest,
            Self::Unnest => DropKind::Unnest,
        }
    }

    pub fn nest_target(&self) -> Option<&str> {
        match self {
            Self::Nest { target } => Some(target.as_str()),
            Self::Reorder | Self::Unnest => None,
        }
    }
}

impl fmt::Display for DropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reorder => f.write_str("reorder"),
            Self::Nest { target } => write!(f, "nest under {target}"),
            Self::Unnest => f.write_str("unnest"),
        }
    }
}

/// Payload-free discriminant of [`DropMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropKind {
    Reorder,
    Nest,
    Unnest,
}

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// The band of a hovered row's height, as fractions from its top, that
/// means "nest under this row". Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NestZone {
    #[serde(default = "default_nest_start")]
    pub start: f32,
    #[serde(default = "default_nest_end")]
    pub end: f32,
}

impl NestZone {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn contains(self, fraction: f32) -> bool {
        fraction >= self.start && fraction <= self.end
    }
}

impl Default for NestZone {
    fn default() -> Self {
        Self::new(default_nest_start(), default_nest_end())
    }
}

pub(crate) const fn default_nest_start() -> f32 {
    0.25
}

pub(crate) const fn default_nest_end() -> f32 {
    0.75
}

pub(crate) const fn default_edge_threshold() -> f32 {
    50.0
}

// ---------------------------------------------------------------------------
// DropClassifier
// ---------------------------------------------------------------------------

/// Pure pointer → [`DropMode`] mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropClassifier {
    pub zone: NestZone,
    /// Distance from the viewport's top or bottom edge that means "unnest"
    /// when the pointer is over no row.
    pub edge_threshold: f32,
}

impl Default for DropClassifier {
    fn default() -> Self {
        Self {
            zone: NestZone::default(),
            edge_threshold: default_edge_threshold(),
        }
    }
}

impl DropClassifier {
    pub const fn new(zone: NestZone, edge_threshold: f32) -> Self {
        Self {
            zone,
            edge_threshold,
        }
    }

    /// Classify one pointer update.
    pub fn classify(&self, probe: &DropProbe<'_>) -> DropMode {
        let y = probe.pointer_y();

        let hovered = probe
            .rows
            .iter()
            .filter(|row| row.id != probe.dragged_id)
            .find(|row| row.span.contains(y));

        if let Some(row) = hovered {
            let fraction = row.span.fraction(y);
            trace!(row = %row.id, fraction, "pointer over row");
            return if self.zone.contains(fraction) {
                DropMode::Nest {
                    target: row.id.clone(),
                }
            } else {
                DropMode::Reorder
            };
        }

        let near_top = y < probe.viewport.top + self.edge_threshold;
        let near_bottom = y > probe.viewport.bottom - self.edge_threshold;
        if near_top || near_bottom {
            DropMode::Unnest
        } else {
            DropMode::Reorder
        }
    }
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// Notification that the nest-target highlight must be redrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "highlight", content = "id", rename_all = "snake_case")]
pub enum HighlightChange {
    Set(String),
    Cleared,
}

/// Tracks the single highlighted row and emits changes only.
#[derive(Debug, Clone, Default)]
pub struct HighlightTracker {
    current: Option<String>,
}

impl HighlightTracker {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Fold a fresh classification in. Returns `Some` only when the
    /// highlighted row changed.
    pub fn observe(&mut self, mode: &DropMode) -> Option<HighlightChange> {
        match mode.nest_target() {
            Some(target) if self.current.as_deref() == Some(target) => None,
            Some(target) => {
                self.current = Some(target.to_string());
                Some(HighlightChange::Set(target.to_string()))
            }
            None => self.clear(),
        }
    }

    /// Drop any highlight. Returns `Some(Cleared)` only if one was shown.
    pub fn clear(&mut self) -> Option<HighlightChange> {
        self.current.take().map(|_| HighlightChange::Cleared)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::geometry::{RowBounds, Span};

    const VIEWPORT: Span = Span::new(0.0, 1000.0);

    fn rows() -> Vec<RowBounds> {
        vec![
            RowBounds::new("a", 100.0, 140.0),
            RowBounds::new("b", 140.0, 180.0),
            RowBounds::new("d", 180.0, 220.0),
        ]
    }

    /// Probe whose dragged row is centered on `y`.
    fn probe_at(rows: &[RowBounds], y: f32) -> DropProbe<'_> {
        DropProbe {
            dragged_id: "d",
            dragged: Span::new(y - 20.0, y + 20.0),
            rows,
            viewport: VIEWPORT,
        }
    }

    #[test]
    fn middle_of_row_nests() {
        let rows = rows();
        let mode = DropClassifier::default().classify(&probe_at(&rows, 120.0));
        assert_eq!(
            mode,
            DropMode::Nest {
                target: "a".into()
            }
        );
    }

    #[test]
    fn nest_zone_edges_are_inclusive() {
        let rows = rows();
        let classifier = DropClassifier::default();
        assert_eq!(classifier.classify(&probe_at(&rows, 110.0)).kind(), DropKind::Nest);
        assert_eq!(classifier.classify(&probe_at(&rows, 130.0)).kind(), DropKind::Nest);
    }

    #[test]
    fn outer_band_reorders() {
        let rows = rows();
        let classifier = DropClassifier::default();
        assert_eq!(classifier.classify(&probe_at(&rows, 104.0)), DropMode::Reorder);
        assert_eq!(classifier.classify(&probe_at(&rows, 136.0)), DropMode::Reorder);
    }

    #[test]
    fn dragged_row_is_never_a_target() {
        let rows = rows();
        // 200 is the middle of the dragged row itself
        let mode = DropClassifier::default().classify(&probe_at(&rows, 200.0));
        assert_eq!(mode, DropMode::Reorder);
    }

    #[test]
    fn shared_edge_goes_to_first_row() {
        let rows = rows();
        let classifier = DropClassifier::new(NestZone::new(0.0, 1.0), 50.0);
        assert_eq!(
            classifier.classify(&probe_at(&rows, 140.0)).nest_target(),
            Some("a")
        );
    }

    #[test]
    fn gap_near_top_edge_unnests() {
        let rows = rows();
        assert_eq!(
            DropClassifier::default().classify(&probe_at(&rows, 30.0)),
            DropMode::Unnest
        );
    }

    #[test]
    fn gap_near_bottom_edge_unnests() {
        let rows = rows();
        assert_eq!(
            DropClassifier::default().classify(&probe_at(&rows, 960.0)),
            DropMode::Unnest
        );
    }

    #[test]
    fn gap_away_from_edges_reorders() {
        let rows = rows();
        assert_eq!(
            DropClassifier::default().classify(&probe_at(&rows, 500.0)),
            DropMode::Reorder
        );
    }

    #[test]
    fn highlight_changes_only_on_new_target() {
        let mut tracker = HighlightTracker::default();
        let nest_a = DropMode::Nest {
            target: "a".into(),
        };
        let nest_b = DropMode::Nest {
            target: "b".into(),
        };

        assert_eq!(tracker.observe(&nest_a), Some(HighlightChange::Set("a".into())));
        assert_eq!(tracker.observe(&nest_a), None);
        assert_eq!(tracker.observe(&nest_b), Some(HighlightChange::Set("b".into())));
        assert_eq!(tracker.current(), Some("b"));
        assert_eq!(tracker.observe(&DropMode::Reorder), Some(HighlightChange::Cleared));
        assert_eq!(tracker.observe(&DropMode::Unnest), None);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn clear_without_highlight_is_silent() {
        let mut tracker = HighlightTracker::default();
        assert_eq!(tracker.clear(), None);
    }

    #[test]
    fn drop_mode_wire_shape() {
        let json = serde_json::to_string(&DropMode::Nest {
            target: "p".into(),
        })
        .expect("serialize");
        assert_eq!(json, r#"{"mode":"nest","target":"p"}"#);
        let back: DropMode = serde_json::from_str(r#"{"mode":"unnest"}"#).expect("parse");
        assert_eq!(back, DropMode::Unnest);
    }
}
