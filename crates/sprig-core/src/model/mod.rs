//! Data model shared by every engine component.

pub mod flat_list;
pub mod node;

pub use flat_list::FlatList;
pub use node::{Node, ReorderItem};
