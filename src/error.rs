use crate::graph::NodeId;
use crate::value::Value;
use thiserror::Error;

/// Errors raised while constructing a runtime graph instance.
///
/// All of these are fatal: no instance is created and nothing is cached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphConstructionError {
    #[error("graph definition contains no nodes")]
    EmptyGraph,

    #[error("node {node_id} references input node {input_id}, which does not exist in the graph")]
    NullInput { node_id: NodeId, input_id: NodeId },

    #[error("duplicate node: {message} (node {node_id})")]
    DuplicateNode { node_id: NodeId, message: String },

    #[error("graph is missing a required {kind} node")]
    MissingRequiredNode { kind: &'static str },
}

/// Structural problems reported by the graph validator.
///
/// Validation accumulates every finding instead of stopping at the first one,
/// so a rule editor can show the complete list. A graph with validation
/// errors may still be persisted as a draft by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("the graph contains a dependency cycle involving nodes {node_ids:?}")]
    CycleDetected { node_ids: Vec<NodeId> },

    #[error("the graph has no final node")]
    FinalNodeMissing,

    #[error("the graph has more than one final node: {node_ids:?}")]
    FinalNodeDuplicate { node_ids: Vec<NodeId> },

    #[error("final node {node_id} is invalid: {message}")]
    FinalNodeInput { node_id: NodeId, message: String },

    #[error("the graph has no change-detection node")]
    ConfigNodeMissing,

    #[error("the graph has more than one change-detection node: {node_ids:?}")]
    ConfigNodeDuplicate { node_ids: Vec<NodeId> },

    #[error("node {node_id} ({name:?}) is misconfigured: {message}")]
    NodeConfig {
        node_id: NodeId,
        name: Option<String>,
        message: String,
    },

    #[error("operator on node {node_id} ({name:?}) is misconfigured: {message}")]
    OperatorConfig {
        node_id: NodeId,
        name: Option<String>,
        message: String,
    },
}

/// Errors that abort a single evaluation pass.
///
/// A failed pass yields no boolean result and leaves any previously held
/// snapshot untouched, so callers may safely retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("cannot evaluate: the graph contains a dependency cycle involving nodes {node_ids:?}")]
    Cycle { node_ids: Vec<NodeId> },

    #[error("provider path '{path}' is malformed: {message}")]
    MalformedPath { path: String, message: String },

    #[error("data source '{source}' not found in the data context")]
    SourceNotFound { r#source: String },

    #[error("type mismatch in {operation}: expected {expected}, found value '{found}'")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },

    #[error("operator {operation} received no value for a required input")]
    NullOperand { operation: String },

    #[error("regex pattern '{pattern}' failed to compile: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("node {node_id} was evaluated before its inputs")]
    MissingResult { node_id: NodeId },
}

/// Failures while computing a structure hash.
///
/// These indicate environment corruption rather than recoverable input
/// problems and are treated as fatal by every caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    #[error("failed to serialize the node list for hashing: {0}")]
    SerializationFailed(String),

    #[error("'{0}' is not a 64-character lowercase hex SHA-256 digest")]
    InvalidFormat(String),

    #[error("failed to compute the structure hash: {0}")]
    HashComputationFailed(String),
}

/// Errors surfaced by the graph instance cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Construction(#[from] GraphConstructionError),
}

/// Errors raised when converting a custom rule format into a
/// [`GraphDefinition`](crate::graph::GraphDefinition).
#[derive(Error, Debug, Clone)]
pub enum DefinitionConversionError {
    #[error("invalid rule definition: {0}")]
    InvalidDefinition(String),
}
