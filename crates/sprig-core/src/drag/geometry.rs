//! Screen geometry consumed by the drop classifier.
//!
//! All coordinates are vertical only, in the host's units, with `y` growing
//! downward. The viewport span is expressed in the same coordinate space as
//! the rows.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

/// A closed vertical interval `[top, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub top: f32,
    pub bottom: f32,
}

impl Span {
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(self) -> f32 {
        self.top + self.height() / 2.0
    }

    /// Inclusive on both edges, so a pointer exactly on a shared edge hits
    /// the first row that claims it.
    pub fn contains(self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }

    /// Where `y` sits within the span, `0.0` at the top and `1.0` at the
    /// bottom. A degenerate span reports `0.0`.
    pub fn fraction(self, y: f32) -> f32 {
        let height = self.height();
        if height <= 0.0 || !height.is_finite() {
            return 0.0;
        }
        (y - self.top) / height
    }

    /// This span moved by `dy`.
    pub fn offset(self, dy: f32) -> Self {
        Self::new(self.top + dy, self.bottom + dy)
    }
}

/// The on-screen bounds of one rendered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBounds {
    pub id: String,
    #[serde(flatten)]
    pub span: Span,
}

impl RowBounds {
    pub fn new(id: impl Into<String>, top: f32, bottom: f32) -> Self {
        Self {
            id: id.into(),
            span: Span::new(top, bottom),
        }
    }
}

/// One pointer-position update as seen by the classifier.
#[derive(Debug, Clone, Copy)]
pub struct DropProbe<'a> {
    /// Id of the row being dragged. Its own entry in `rows`, if any, is
    /// never a candidate target.
    pub dragged_id: &'a str,
    /// Current bounds of the dragged row. The probe point is its center.
    pub dragged: Span,
    /// Rows currently rendered, in screen order.
    pub rows: &'a [RowBounds],
    pub viewport: Span,
}

impl DropProbe<'_> {
    pub fn pointer_y(&self) -> f32 {
        self.dragged.center()
    }
}
