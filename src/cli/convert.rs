//! JSON <-> tree conversion utilities

use crate::tree::{MemoryNode, Node};

/// Reads a JSON document as a tree rooted at `/`.
///
/// Nested objects are child nodes; all other members are properties.
pub fn json_to_tree(json: &serde_json::Value) -> MemoryNode {
    MemoryNode::from_json("", json)
}

/// Matched nodes as a JSON array of their paths.
pub fn nodes_to_json<N: Node>(nodes: &[N]) -> serde_json::Value {
    serde_json::Value::Array(
        nodes
            .iter()
            .map(|node| serde_json::Value::String(node.path().to_string()))
            .collect(),
    )
}
