//! Drag-to-reorder: classify pointer updates, drive one gesture, and plan
//! the commit payload.
//!
//! - [`geometry`]: row, pointer and viewport bounds.
//! - [`classify`]: pointer → [`DropMode`], plus change-only highlighting.
//! - [`plan`]: `ReorderItem` builders with dense per-group `sortOrder`.
//! - [`session`]: the [`DragSession`] state machine tying the three together.

pub mod classify;
pub mod geometry;
pub mod plan;
pub mod session;

pub use classify::{DropClassifier, DropKind, DropMode, HighlightChange, HighlightTracker, NestZone};
pub use geometry::{DropProbe, RowBounds, Span};
pub use session::{DragEnd, DragOutcome, DragSession, PositionUpdate, SessionError};
