//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions so integrations
//! can pull in the core surface with a single `use henka::prelude::*;`.

// Graph model
pub use crate::graph::{
    DetectionMode, DetectionSettings, GraphDefinition, IntoGraph, Node, NodeId, NodeKind,
};

// Operator catalog
pub use crate::ops::Operator;

// Values
pub use crate::value::{Value, ValueType};

// Validation and hashing
pub use crate::graph::hash::structure_hash;
pub use crate::graph::validator::validate_graph;

// Evaluation
pub use crate::eval::{evaluate_graph, DataContext, GraphOutcome, Snapshot, SnapshotEntry};

// Runtime
pub use crate::runtime::{CacheConfig, GraphInstanceCache, RuleId, StatefulLogicGraph};

// Error types
pub use crate::error::{
    CacheError, EvaluationError, GraphConstructionError, HashError, ValidationError,
};

// Map type used throughout the crate's public signatures
pub use ahash::AHashMap;
