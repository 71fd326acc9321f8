//! # Henka - Stateful Logic Graph Engine
//!
//! **Henka** gates data-synchronization jobs on a user-authored,
//! graph-shaped change-detection rule. A rule is a small DAG of typed nodes:
//! providers read live values out of JSON-like source data, logic nodes
//! apply operators from a closed catalog, a single change-detection node
//! diffs provider values against a snapshot carried between evaluations, and
//! a single final node yields the boolean gating decision.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic. It operates on a canonical
//! [`GraphDefinition`](graph::GraphDefinition); the primary workflow is:
//!
//! 1.  **Convert**: Implement [`IntoGraph`](graph::IntoGraph) for your own
//!     rule format to translate it into the canonical node list.
//! 2.  **Validate**: Run [`validate_graph`](graph::validator::validate_graph)
//!     and show the accumulated findings to the rule author. Only an
//!     error-free graph should be finalized.
//! 3.  **Cache**: Hand the definition to the
//!     [`GraphInstanceCache`](runtime::GraphInstanceCache). Instances are
//!     keyed by rule id and structure hash, so edited rules get fresh
//!     instances while the old shape keeps its snapshot until evicted.
//! 4.  **Evaluate**: Call
//!     [`StatefulLogicGraph::evaluate`](runtime::StatefulLogicGraph::evaluate)
//!     once per polling cycle. The instance remembers the last observed
//!     provider values and reports whether anything changed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use henka::prelude::*;
//! use henka::graph::hash;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A rule graph: gate on any change of the temperature reading.
//!     let definition = GraphDefinition::new(vec![
//!         Node::provider(1, "source.plc.sensors.temperature"),
//!         Node::config(
//!             2,
//!             DetectionSettings {
//!                 mode: DetectionMode::Or,
//!                 active: true,
//!                 time_window_enabled: false,
//!                 time_window_millis: 0,
//!             },
//!             vec![1],
//!         ),
//!         Node::final_node(3, 2),
//!     ]);
//!
//!     // Validate before finalizing the rule.
//!     let errors = validate_graph(&definition.nodes);
//!     assert!(errors.is_empty());
//!
//!     // One cache for the whole process; instances keep their snapshots.
//!     let cache = GraphInstanceCache::new();
//!     let hash = hash::structure_hash(&definition.nodes)?;
//!     let graph = cache.get_or_create("rule-42", &hash, &definition)?;
//!
//!     let mut sources = AHashMap::new();
//!     sources.insert(
//!         "plc".to_string(),
//!         serde_json::json!({ "sensors": { "temperature": 20.0 } }),
//!     );
//!
//!     // First pass: no prior snapshot, every provider counts as changed.
//!     assert!(graph.evaluate(sources.clone())?);
//!     // Second pass with identical data: nothing changed.
//!     assert!(!graph.evaluate(sources)?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod eval;
pub mod graph;
pub mod ops;
pub mod path;
pub mod prelude;
pub mod runtime;
pub mod value;
