//! The drag gesture state machine.
//!
//! ```text
//!            on_start
//!   Idle ───────────────▶ Dragging ──┐ on_position_update / on_visual_move
//!    ▲                       │  ▲    │
//!    │  on_release           │  └────┘
//!    │  (Commit | InvalidDrop | Ignored)
//!    │  on_cancel (Cancelled)│
//!    └───────────────────────┘
//! ```
//!
//! A session owns two copies of the list while dragging: the pre-drag
//! snapshot, which is handed back untouched on cancel or invalid drop, and
//! the scratch visual order that live `REORDER` moves are applied to. Only
//! the scratch order at release time feeds a commit.
//!
//! Nothing structural is emitted while dragging. Each gesture ends with
//! exactly one [`DragEnd`], and every transient field (dragged id, mode,
//! highlight) is gone afterwards whatever the outcome.

use std::mem;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::classify::{DropClassifier, DropMode, HighlightChange, HighlightTracker};
use super::geometry::{DropProbe, RowBounds, Span};
use super::plan;
use crate::config::DragConfig;
use crate::error::ErrorCode;
use crate::hierarchy::NodeIndex;
use crate::hierarchy::cycles::{CycleCheck, CycleWarning, check_reparent};
use crate::model::{FlatList, ReorderItem};

/// Misuse of the session API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no drag in progress")]
    NotDragging,
    #[error("node '{id}' is not in the list")]
    UnknownNode { id: String },
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotDragging => ErrorCode::InvalidSessionState,
            Self::UnknownNode { .. } => ErrorCode::NodeNotFound,
        }
    }
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Hand this payload to the persistence layer.
    Commit { items: Vec<ReorderItem> },
    /// The nest would have created a cycle. Show `restore` again.
    InvalidDrop {
        warning: CycleWarning,
        restore: FlatList,
    },
    /// The gesture was abandoned. Show `restore` again.
    Cancelled { restore: FlatList },
    /// Release with nothing to act on (no drag, or the dragged row or
    /// nest target vanished from the list).
    Ignored,
}

impl DragOutcome {
    #[must_use]
    pub fn commit_items(&self) -> Option<&[ReorderItem]> {
        match self {
            Self::Commit { items } => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Result of `on_release` / `on_cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragEnd {
    pub outcome: DragOutcome,
    /// `Some(Cleared)` when a nest highlight was still showing.
    pub highlight: Option<HighlightChange>,
}

/// Result of one pointer update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionUpdate {
    pub mode: DropMode,
    pub highlight: Option<HighlightChange>,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    dragged_id: String,
    snapshot: FlatList,
    scratch: FlatList,
    mode: DropMode,
    highlight: HighlightTracker,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Dragging(Box<ActiveDrag>),
}

/// One drag gesture at a time over one list.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    classifier: DropClassifier,
    infer_reparent_on_reorder: bool,
    state: State,
}

impl DragSession {
    #[must_use]
    pub fn new(config: &DragConfig) -> Self {
        Self {
            classifier: config.classifier(),
            infer_reparent_on_reorder: config.infer_reparent_on_reorder,
            state: State::Idle,
        }
    }

    // -- queries -----------------------------------------------------------

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    /// The dragged row is drawn raised for the whole gesture.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.is_dragging()
    }

    #[must_use]
    pub fn dragged_id(&self) -> Option<&str> {
        self.active().map(|a| a.dragged_id.as_str())
    }

    #[must_use]
    pub fn mode(&self) -> Option<&DropMode> {
        self.active().map(|a| &a.mode)
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        self.active().and_then(|a| a.highlight.current())
    }

    /// The live visual order while dragging.
    #[must_use]
    pub fn visual_order(&self) -> Option<&FlatList> {
        self.active().map(|a| &a.scratch)
    }

    fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            State::Dragging(active) => Some(active.as_ref()),
            State::Idle => None,
        }
    }

    fn active_mut(&mut self) -> Result<&mut ActiveDrag, SessionError> {
        match &mut self.state {
            State::Dragging(active) => Ok(active.as_mut()),
            State::Idle => Err(SessionError::NotDragging),
        }
    }

    // -- events ------------------------------------------------------------

    /// Begin dragging `node_id` within `list`.
    ///
    /// Starting while a drag is active cancels that drag first; its
    /// [`DragEnd`] is returned so the host can restore the old list.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownNode`] if `node_id` is not in `list`. The
    /// session state is left untouched in that case.
    pub fn on_start(
        &mut self,
        list: FlatList,
        node_id: &str,
    ) -> Result<Option<DragEnd>, SessionError> {
        if list.position_of(node_id).is_none() {
            return Err(SessionError::UnknownNode {
                id: node_id.to_string(),
            });
        }

        let previous = if self.is_dragging() {
            warn!(node = node_id, "drag started while another was active; cancelling it");
            Some(self.on_cancel())
        } else {
            None
        };

        debug!(node = node_id, rows = list.len(), "drag started");
        self.state = State::Dragging(Box::new(ActiveDrag {
            dragged_id: node_id.to_string(),
            scratch: list.clone(),
            snapshot: list,
            mode: DropMode::Reorder,
            highlight: HighlightTracker::default(),
        }));
        Ok(previous)
    }

    /// Reclassify after the dragged row moved on screen.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotDragging`] outside a gesture.
    pub fn on_position_update(
        &mut self,
        dragged: Span,
        rows: &[RowBounds],
        viewport: Span,
    ) -> Result<PositionUpdate, SessionError> {
        let classifier = self.classifier;
        let active = self.active_mut()?;

        let probe = DropProbe {
            dragged_id: &active.dragged_id,
            dragged,
            rows,
            viewport,
        };
        let mode = classifier.classify(&probe);
        trace!(y = probe.pointer_y(), %mode, "position update");

        if mode != active.mode {
            debug!(from = %active.mode, to = %mode, "drop mode changed");
            active.mode = mode.clone();
        }
        let highlight = active.highlight.observe(&mode);
        Ok(PositionUpdate { mode, highlight })
    }

    /// Move a row in the visual order. Only applied in `REORDER` mode.
    ///
    /// Returns whether the visual order changed.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotDragging`] outside a gesture.
    pub fn on_visual_move(&mut self, from: usize, to: usize) -> Result<bool, SessionError> {
        let active = self.active_mut()?;
        if active.mode != DropMode::Reorder {
            trace!(from, to, mode = %active.mode, "visual move ignored");
            return Ok(false);
        }
        Ok(active.scratch.move_item(from, to))
    }

    /// Finish the gesture and decide what to commit.
    pub fn on_release(&mut self) -> DragEnd {
        let State::Dragging(mut active) = mem::take(&mut self.state) else {
            return DragEnd {
                outcome: DragOutcome::Ignored,
                highlight: None,
            };
        };
        let highlight = active.highlight.clear();
        let outcome = self.resolve(*active);
        DragEnd { outcome, highlight }
    }

    /// Abandon the gesture without committing anything.
    pub fn on_cancel(&mut self) -> DragEnd {
        let State::Dragging(mut active) = mem::take(&mut self.state) else {
            return DragEnd {
                outcome: DragOutcome::Ignored,
                highlight: None,
            };
        };
        debug!(node = %active.dragged_id, "drag cancelled");
        DragEnd {
            highlight: active.highlight.clear(),
            outcome: DragOutcome::Cancelled {
                restore: active.snapshot,
            },
        }
    }

    fn resolve(&self, active: ActiveDrag) -> DragOutcome {
        let ActiveDrag {
            dragged_id,
            snapshot,
            scratch,
            mode,
            ..
        } = active;
        let list = scratch.as_slice();
        let index = NodeIndex::new(list);

        let Some(dragged) = index.get(&dragged_id) else {
            warn!(node = %dragged_id, "dragged node vanished before release");
            return DragOutcome::Ignored;
        };

        let items = match mode {
            DropMode::Nest { target } => {
                let Some(target_node) = index.get(&target) else {
                    warn!(node = %dragged_id, %target, "nest target vanished before release");
                    return DragOutcome::Ignored;
                };
                match check_reparent(&index, &dragged_id, target_node) {
                    CycleCheck::WouldCycle(warning) => {
                        debug!(%warning, "drop rejected");
                        return DragOutcome::InvalidDrop {
                            warning,
                            restore: snapshot,
                        };
                    }
                    CycleCheck::Allowed => plan::with_nesting(list, &dragged_id, &target),
                }
            }
            DropMode::Unnest if dragged.parent().is_none() => plan::from_current_order(list),
            DropMode::Unnest => plan::with_unnesting(list, &dragged_id),
            DropMode::Reorder if self.infer_reparent_on_reorder => {
                plan::with_sibling_drop(list, &dragged_id)
            }
            DropMode::Reorder => plan::from_current_order(list),
        };

        debug!(node = %dragged_id, items = items.len(), "drag committed");
        DragOutcome::Commit { items }
    }
}
