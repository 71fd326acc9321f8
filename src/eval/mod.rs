//! Graph evaluation: the data context, the per-pass results arena, and the
//! topological evaluator.

use crate::error::EvaluationError;
use crate::graph::{node_index, topo, Node, NodeId, NodeIndex, NodeKind};
use crate::path::ProviderPath;
use crate::value::Value;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

mod change;

pub use change::{Snapshot, SnapshotEntry};

/// Per-pass node results, keyed by node id. Created fresh for every
/// evaluation so node definitions stay immutable and evaluation re-entrant.
pub type ResultsArena = AHashMap<NodeId, Value>;

static NULL: Value = Value::Null;

/// Everything one evaluation pass reads: the live source data, the snapshot
/// carried over from the previous pass, and the clock.
///
/// "Now" is injected rather than read from the system clock inside the
/// evaluator, so time-window behavior is reproducible in tests.
#[derive(Debug, Clone)]
pub struct DataContext {
    sources: AHashMap<String, serde_json::Value>,
    snapshot: Snapshot,
    now: DateTime<Utc>,
}

impl DataContext {
    pub fn new(sources: AHashMap<String, serde_json::Value>) -> Self {
        Self {
            sources,
            snapshot: Snapshot::default(),
            now: Utc::now(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn source(&self, name: &str) -> Option<&serde_json::Value> {
        self.sources.get(name)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn now_millis(&self) -> u64 {
        self.now.timestamp_millis().max(0) as u64
    }
}

/// The result of one evaluation pass: the gating verdict plus the snapshot
/// freshly produced by the config node, if the graph has one.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOutcome {
    pub verdict: bool,
    pub snapshot: Option<Snapshot>,
}

/// Evaluates the graph once against the given context.
///
/// Nodes are visited strictly in dependency order, so a node's `calculate`
/// only ever reads inputs that are already in the arena. Any unrecoverable
/// node failure aborts the pass with no boolean result.
pub fn evaluate_graph(nodes: &[Node], ctx: &DataContext) -> Result<GraphOutcome, EvaluationError> {
    let order = topo::topological_order(nodes).map_err(|cycle| EvaluationError::Cycle {
        node_ids: cycle.node_ids,
    })?;
    let index = node_index(nodes);

    let mut arena = ResultsArena::with_capacity(nodes.len());
    let mut produced_snapshot = None;
    let mut final_id = None;

    for id in order {
        let Some(node) = index.get(&id).copied() else {
            continue;
        };
        let value = match &node.kind {
            NodeKind::Provider { path, .. } => resolve_provider(path, ctx)?,
            NodeKind::Constant { value } => value.clone(),
            NodeKind::Logic { operator } => {
                let inputs = input_values(node, &arena);
                operator.execute(&inputs, ctx.now())?
            }
            NodeKind::Config(settings) => {
                let observations = gather_observations(node, &index, &arena);
                let (verdict, snapshot) =
                    change::detect(settings, observations, ctx.snapshot(), ctx.now_millis());
                produced_snapshot = Some(snapshot);
                Value::Bool(verdict)
            }
            NodeKind::Final => {
                final_id = Some(node.id);
                match node.inputs.first() {
                    Some(input) => arena.get(input).cloned().unwrap_or(Value::Null),
                    None => Value::Null,
                }
            }
        };
        trace!(node = node.id, result = %value, "node calculated");
        arena.insert(node.id, value);
    }

    let verdict = match final_id.and_then(|id| arena.get(&id)) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) | None => false,
        Some(other) => {
            return Err(EvaluationError::TypeMismatch {
                operation: "FINAL".to_string(),
                expected: "boolean".to_string(),
                found: other.clone(),
            });
        }
    };

    debug!(verdict, "graph evaluation finished");
    Ok(GraphOutcome {
        verdict,
        snapshot: produced_snapshot,
    })
}

/// Reads a provider's live value. An unknown source name or a malformed
/// path is fatal; a path that walks off the data resolves to `Null`.
fn resolve_provider(path: &str, ctx: &DataContext) -> Result<Value, EvaluationError> {
    let parsed = ProviderPath::parse(path)?;
    let root = ctx
        .source(&parsed.source)
        .ok_or_else(|| EvaluationError::SourceNotFound {
            source: parsed.source.clone(),
        })?;
    Ok(parsed
        .resolve(root)
        .map(Value::from)
        .unwrap_or(Value::Null))
}

/// Collects the already-computed results of a node's inputs, in input order.
fn input_values<'a>(node: &Node, arena: &'a ResultsArena) -> Vec<&'a Value> {
    node.inputs
        .iter()
        .map(|input| arena.get(input).unwrap_or(&NULL))
        .collect()
}

/// Pairs each provider input of the config node with its live result. Only
/// provider inputs carry a snapshot path; anything else was already flagged
/// by the validator and is skipped here.
fn gather_observations(
    node: &Node,
    index: &NodeIndex<'_>,
    arena: &ResultsArena,
) -> Vec<(String, Value)> {
    node.inputs
        .iter()
        .filter_map(|input| index.get(input).copied())
        .filter_map(|source| match &source.kind {
            NodeKind::Provider { path, .. } => Some((
                path.clone(),
                arena.get(&source.id).cloned().unwrap_or(Value::Null),
            )),
            _ => None,
        })
        .collect()
}
