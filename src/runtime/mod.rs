//! Runtime instances and their cache.

mod cache;
mod stateful;

pub use cache::{CacheConfig, GraphInstanceCache, RuleId};
pub use stateful::StatefulLogicGraph;
