use crate::ops::Operator;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};

/// Graph-local node identifier. Unique within one rule graph.
pub type NodeId = u32;

/// One vertex of a rule's logic graph.
///
/// `inputs` are dependency edges by id, not ownership: the graph owns every
/// node and a node merely names the nodes whose results it consumes, in
/// order. The UI offsets are ignored by evaluation but participate in the
/// structure hash, so moving a node on the canvas produces a new cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub offset_x: f64,
    pub offset_y: f64,
    pub inputs: Vec<NodeId>,
    pub kind: NodeKind,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Reads a live value from the evaluation data context.
    Provider {
        path: String,
        arc_id: Option<String>,
    },
    /// A fixed literal.
    Constant { value: Value },
    /// Dispatches to an operator from the catalog.
    Logic { operator: Operator },
    /// The unique stateful change-detection node.
    Config(DetectionSettings),
    /// The unique boolean sink of the graph.
    Final,
}

/// Aggregation policy over the per-provider "changed" flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    And,
    Or,
}

/// Configuration of the change-detection node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    pub mode: DetectionMode,
    pub active: bool,
    pub time_window_enabled: bool,
    pub time_window_millis: u64,
}

impl Node {
    pub fn provider(id: NodeId, path: impl Into<String>) -> Self {
        Self::leaf(
            id,
            NodeKind::Provider {
                path: path.into(),
                arc_id: None,
            },
        )
    }

    pub fn constant(id: NodeId, value: Value) -> Self {
        Self::leaf(id, NodeKind::Constant { value })
    }

    pub fn logic(id: NodeId, operator: Operator, inputs: Vec<NodeId>) -> Self {
        Self {
            inputs,
            ..Self::leaf(id, NodeKind::Logic { operator })
        }
    }

    pub fn config(id: NodeId, settings: DetectionSettings, inputs: Vec<NodeId>) -> Self {
        Self {
            inputs,
            ..Self::leaf(id, NodeKind::Config(settings))
        }
    }

    pub fn final_node(id: NodeId, input: NodeId) -> Self {
        Self {
            inputs: vec![input],
            ..Self::leaf(id, NodeKind::Final)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_offsets(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn with_arc_id(mut self, arc_id: impl Into<String>) -> Self {
        if let NodeKind::Provider { arc_id: slot, .. } = &mut self.kind {
            *slot = Some(arc_id.into());
        }
        self
    }

    fn leaf(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            offset_x: 0.0,
            offset_y: 0.0,
            inputs: Vec::new(),
            kind,
        }
    }

    /// Static output type, as used by the validator. Provider values are
    /// unknown until execution and report [`ValueType::Any`].
    pub fn static_return_type(&self) -> ValueType {
        match &self.kind {
            NodeKind::Provider { .. } => ValueType::Any,
            NodeKind::Constant { value } => value.value_type(),
            NodeKind::Logic { operator } => operator.return_type(),
            NodeKind::Config(_) => ValueType::Bool,
            NodeKind::Final => ValueType::Bool,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self.kind, NodeKind::Config(_))
    }

    pub fn is_final(&self) -> bool {
        matches!(self.kind, NodeKind::Final)
    }

    pub fn is_provider(&self) -> bool {
        matches!(self.kind, NodeKind::Provider { .. })
    }

    /// The constant carried by this node, if it is a constant node.
    pub fn constant_value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Constant { value } => Some(value),
            _ => None,
        }
    }
}
