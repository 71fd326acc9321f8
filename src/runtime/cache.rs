//! The thread-safe graph instance cache.
//!
//! Instances are keyed by `(rule id, structure hash)`, so every structural
//! edit of a rule creates a fresh instance while older shapes keep their
//! snapshots until evicted. The map itself guarantees atomic get-or-create;
//! it does not synchronize later use of the returned instance.

use crate::error::CacheError;
use crate::graph::hash;
use crate::graph::GraphDefinition;
use crate::runtime::StatefulLogicGraph;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use itertools::Itertools;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Identifier of a rule, owned by the surrounding synchronization system.
pub type RuleId = String;

/// Tuning knobs for the instance cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How many structure versions of one rule may live in the cache at
    /// once. The least recently used versions beyond this bound are evicted
    /// on insert.
    pub max_versions_per_rule: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_versions_per_rule: 8,
        }
    }
}

struct CacheSlot {
    graph: Arc<StatefulLogicGraph>,
    last_used: AtomicU64,
}

/// Concurrent map of live [`StatefulLogicGraph`] instances.
pub struct GraphInstanceCache {
    entries: DashMap<(RuleId, String), CacheSlot>,
    config: CacheConfig,
    clock: AtomicU64,
}

impl Default for GraphInstanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphInstanceCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock: AtomicU64::new(0),
        }
    }

    /// Atomically fetches the instance for `(rule_id, hash)`, constructing
    /// it from `definition` on a miss.
    ///
    /// Construction re-validates the graph shape; on failure nothing is
    /// inserted and the error is returned to the caller.
    pub fn get_or_create(
        &self,
        rule_id: &str,
        hash: &str,
        definition: &GraphDefinition,
    ) -> Result<Arc<StatefulLogicGraph>, CacheError> {
        hash::verify_format(hash)?;
        let tick = self.clock.fetch_add(1, Ordering::Relaxed);
        let key = (rule_id.to_string(), hash.to_string());

        let graph = match self.entries.entry(key) {
            Entry::Occupied(slot) => {
                slot.get().last_used.store(tick, Ordering::Relaxed);
                debug!(rule_id, hash, "graph instance cache hit");
                slot.get().graph.clone()
            }
            Entry::Vacant(vacant) => {
                let graph = Arc::new(StatefulLogicGraph::new(definition.clone())?);
                info!(rule_id, hash, "graph instance created");
                vacant.insert(CacheSlot {
                    graph: graph.clone(),
                    last_used: AtomicU64::new(tick),
                });
                graph
            }
        };

        self.enforce_bound(rule_id);
        Ok(graph)
    }

    /// Convenience wrapper that computes the structure hash itself.
    pub fn get_or_create_hashed(
        &self,
        rule_id: &str,
        definition: &GraphDefinition,
    ) -> Result<Arc<StatefulLogicGraph>, CacheError> {
        let hash = hash::structure_hash(&definition.nodes)?;
        self.get_or_create(rule_id, &hash, definition)
    }

    /// Evicts every hash version of a rule. Call on rule deletion.
    /// Returns the number of evicted instances.
    pub fn remove(&self, rule_id: &str) -> usize {
        let mut evicted = 0usize;
        self.entries.retain(|(rid, _), _| {
            let keep = rid.as_str() != rule_id;
            if !keep {
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            info!(rule_id, evicted, "graph instances evicted");
        }
        evicted
    }

    /// Drops every cached instance.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps at most `max_versions_per_rule` versions of one rule, dropping
    /// the least recently used beyond the bound.
    fn enforce_bound(&self, rule_id: &str) {
        let versions: Vec<(String, u64)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == rule_id)
            .map(|entry| {
                (
                    entry.key().1.clone(),
                    entry.value().last_used.load(Ordering::Relaxed),
                )
            })
            .collect();
        if versions.len() <= self.config.max_versions_per_rule {
            return;
        }

        let excess = versions.len() - self.config.max_versions_per_rule;
        for (hash, _) in versions
            .into_iter()
            .sorted_by_key(|(_, last_used)| *last_used)
            .take(excess)
        {
            self.entries.remove(&(rule_id.to_string(), hash.clone()));
            info!(rule_id, hash = %hash, "stale graph version evicted");
        }
    }
}
