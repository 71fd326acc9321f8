//! The cached, snapshot-carrying runtime instance of one rule's graph.

use crate::error::{EvaluationError, GraphConstructionError};
use crate::eval::{evaluate_graph, DataContext, Snapshot};
use crate::graph::{GraphDefinition, Node, NodeId};
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

/// One rule's compiled graph plus its evolving snapshot.
///
/// The node list is immutable after construction; the snapshot is the sole
/// cross-call memory and is guarded by a mutex held for the whole pass, so
/// concurrent `evaluate` calls on the same instance serialize instead of
/// racing on the snapshot.
pub struct StatefulLogicGraph {
    nodes: Vec<Node>,
    config_id: NodeId,
    snapshot: Mutex<Snapshot>,
}

impl StatefulLogicGraph {
    /// Validates the definition's shape and builds the instance.
    ///
    /// Fails without constructing anything on an empty graph, duplicate node
    /// ids, dangling input references, or a missing/duplicated
    /// change-detection or final node.
    pub fn new(definition: GraphDefinition) -> Result<Self, GraphConstructionError> {
        let nodes = definition.nodes;
        if nodes.is_empty() {
            return Err(GraphConstructionError::EmptyGraph);
        }

        let mut ids = AHashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(node.id) {
                return Err(GraphConstructionError::DuplicateNode {
                    node_id: node.id,
                    message: "node id is used more than once".to_string(),
                });
            }
        }
        for node in &nodes {
            for input in &node.inputs {
                if !ids.contains(input) {
                    return Err(GraphConstructionError::NullInput {
                        node_id: node.id,
                        input_id: *input,
                    });
                }
            }
        }

        let config_id = require_unique(&nodes, Node::is_config, "change-detection")?;
        require_unique(&nodes, Node::is_final, "final")?;

        Ok(Self {
            nodes,
            config_id,
            snapshot: Mutex::new(Snapshot::default()),
        })
    }

    /// Runs one evaluation pass against live source data, using the system
    /// clock for "now".
    pub fn evaluate(
        &self,
        sources: AHashMap<String, serde_json::Value>,
    ) -> Result<bool, EvaluationError> {
        self.evaluate_at(sources, Utc::now())
    }

    /// Runs one evaluation pass with an injected clock.
    ///
    /// The internal snapshot is replaced only when the pass succeeds; a
    /// failed pass leaves prior state untouched, so callers may retry.
    pub fn evaluate_at(
        &self,
        sources: AHashMap<String, serde_json::Value>,
        now: DateTime<Utc>,
    ) -> Result<bool, EvaluationError> {
        let mut guard = self.snapshot.lock();
        let ctx = DataContext::new(sources)
            .with_snapshot(guard.clone())
            .with_now(now);
        let outcome = evaluate_graph(&self.nodes, &ctx)?;
        if let Some(snapshot) = outcome.snapshot {
            *guard = snapshot;
        }
        debug!(
            config = self.config_id,
            verdict = outcome.verdict,
            "evaluation pass committed"
        );
        Ok(outcome.verdict)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Id of the single change-detection node, resolved at construction.
    pub fn config_node_id(&self) -> NodeId {
        self.config_id
    }

    /// A copy of the currently held snapshot, e.g. for external persistence.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().clone()
    }
}

fn require_unique(
    nodes: &[Node],
    select: impl Fn(&Node) -> bool,
    kind: &'static str,
) -> Result<NodeId, GraphConstructionError> {
    let mut matches = nodes.iter().filter(|&node| select(node));
    let first = matches
        .next()
        .ok_or(GraphConstructionError::MissingRequiredNode { kind })?;
    if let Some(second) = matches.next() {
        return Err(GraphConstructionError::DuplicateNode {
            node_id: second.id,
            message: format!("the graph allows a single {} node", kind),
        });
    }
    Ok(first.id)
}
