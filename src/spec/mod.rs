//! Input layer: JSON schemas + validated in-memory structures.
//!
//! This module is intentionally separate from composition and rendering.
//! It owns:
//! - the node model (interfaces, addresses, links)
//! - session overrides for the boot script

pub mod node;
pub mod session;

pub use node::{Interface, Link, LinkType, Node, NodeSpec};
pub use session::SessionSpec;

#[cfg(test)]
pub(crate) fn node_from(value: serde_json::Value) -> Node {
    let spec: NodeSpec = serde_json::from_value(value).expect("node json");
    spec.validate_and_build().expect("valid node")
}
