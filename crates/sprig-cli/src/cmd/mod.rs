pub mod check;
pub mod completions;
pub mod cycle;
pub mod order;
pub mod plan;
pub mod replay;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sprig_core::Node;
use sprig_core::drag::SessionError;
use std::io::Read;
use std::path::Path;

/// Read and parse a JSON file, or stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A node file is a JSON array of nodes in display order.
pub fn read_nodes(path: &Path) -> Result<Vec<Node>> {
    read_json(path)
}

pub fn find_node<'a>(nodes: &'a [Node], id: &str) -> Result<&'a Node, SessionError> {
    nodes
        .iter()
        .find(|n| n.id == id)
        .ok_or_else(|| SessionError::UnknownNode { id: id.to_string() })
}

fn dash(parent: Option<&str>) -> &str {
    parent.unwrap_or("-")
}
