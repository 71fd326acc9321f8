//! The logic-graph model: node taxonomy, ordering, validation, hashing.

use crate::error::DefinitionConversionError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

mod node;
pub mod topo;
pub mod validator;

pub mod hash;

pub use node::{DetectionMode, DetectionSettings, Node, NodeId, NodeKind};

/// The complete, canonical definition of one rule's logic graph, as produced
/// by an external mapper. Immutable once handed to the instance cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<Node>,
}

impl GraphDefinition {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

/// A trait for custom rule formats that can be converted into a
/// [`GraphDefinition`].
///
/// This is the seam between the engine and whatever DTO layer delivers rule
/// graphs: implement it on your own structs to translate them into the
/// canonical node list.
pub trait IntoGraph {
    /// Consumes the object and converts it into a logic-graph definition.
    fn into_graph(self) -> Result<GraphDefinition, DefinitionConversionError>;
}

/// Lookup table from node id to node, built once per validation or
/// evaluation pass.
pub type NodeIndex<'a> = AHashMap<NodeId, &'a Node>;

/// Indexes the node list by id. When ids collide the last node wins;
/// duplicate ids are reported by construction and validation, not here.
pub fn node_index(nodes: &[Node]) -> NodeIndex<'_> {
    nodes.iter().map(|node| (node.id, node)).collect()
}
