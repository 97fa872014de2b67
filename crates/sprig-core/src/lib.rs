#![forbid(unsafe_code)]
//! sprig-core library.
//!
//! Ordering, cycle protection, drop classification and reorder planning
//! for a hierarchical todo list held as a flat set of nodes linked by
//! `parentId`.
//!
//! - [`hierarchy`]: display order, depths, reparent validation, boundary
//!   queries and diagnostics. Pure and total over corrupt input.
//! - [`drag`]: the drag gesture, from pointer updates to a commit payload.
//! - [`validate`]: payload checks before hand-off to persistence.
//!
//! # Conventions
//!
//! - **Errors**: engine operations return values, never errors. Fallible
//!   edges (`config`, `validate`, session misuse) use `thiserror` enums with
//!   an [`error::ErrorCode`]; file loading returns `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`warn!` when malformed data is
//!   repaired, `debug!` for mode changes and commits, `trace!` per update).

pub mod config;
pub mod drag;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod validate;

pub use drag::{DragOutcome, DragSession, DropMode};
pub use error::ErrorCode;
pub use hierarchy::cycles::{CycleCheck, would_create_cycle};
pub use hierarchy::order::{build_depth_map, order_for_hierarchy};
pub use model::{FlatList, Node, ReorderItem};
