//! Structure hashing and instance cache suite.
mod common;
use common::*;
use henka::prelude::*;
use std::sync::Arc;

#[test]
fn hash_is_deterministic_across_calls() {
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE, HUMIDITY]);
    let first = structure_hash(&definition.nodes).unwrap();
    let second = structure_hash(&definition.nodes).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn any_field_mutation_changes_the_hash() {
    let base = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let base_hash = structure_hash(&base.nodes).unwrap();

    // Semantic change: a different detection mode.
    let other = change_rule(DetectionMode::And, &[TEMPERATURE]);
    assert_ne!(base_hash, structure_hash(&other.nodes).unwrap());

    // Cosmetic change: the same graph, one node nudged on the canvas.
    let mut cosmetic = base.clone();
    cosmetic.nodes[0].offset_x += 1.0;
    assert_ne!(base_hash, structure_hash(&cosmetic.nodes).unwrap());

    // A renamed node also counts.
    let mut renamed = base.clone();
    renamed.nodes[0].name = Some("temperature reading".to_string());
    assert_ne!(base_hash, structure_hash(&renamed.nodes).unwrap());
}

#[test]
fn constant_value_mutation_changes_the_hash() {
    let graph_with_threshold = |threshold: f64| {
        vec![
            Node::provider(1, TEMPERATURE).with_name("temperature"),
            Node::constant(2, Value::Number(threshold)).with_offsets(120.0, 40.0),
            Node::logic(3, Operator::GreaterThan, vec![1, 2]),
            Node::config(4, settings(DetectionMode::Or), vec![1]),
            Node::final_node(5, 4),
        ]
    };
    let at_25 = structure_hash(&graph_with_threshold(25.0)).unwrap();
    let at_26 = structure_hash(&graph_with_threshold(26.0)).unwrap();
    assert_ne!(at_25, at_26);
}

#[test]
fn get_or_create_returns_the_same_instance_for_the_same_key() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let hash = structure_hash(&definition.nodes).unwrap();

    let first = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    let second = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn distinct_hashes_and_rule_ids_get_distinct_instances() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let hash = structure_hash(&definition.nodes).unwrap();

    let mut edited = definition.clone();
    edited.nodes[0].offset_y = 10.0;
    let edited_hash = structure_hash(&edited.nodes).unwrap();

    let original = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    let new_shape = cache.get_or_create("rule-1", &edited_hash, &edited).unwrap();
    let other_rule = cache.get_or_create("rule-2", &hash, &definition).unwrap();

    assert!(!Arc::ptr_eq(&original, &new_shape));
    assert!(!Arc::ptr_eq(&original, &other_rule));
    assert_eq!(cache.len(), 3);
}

#[test]
fn cached_instance_keeps_its_snapshot_between_fetches() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let hash = structure_hash(&definition.nodes).unwrap();

    let graph = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    assert!(graph
        .evaluate_at(plc_sources(20.0, 40.0), at_millis(T0))
        .unwrap());

    // A later polling cycle fetches the same instance and sees the memory.
    let graph = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    assert!(!graph
        .evaluate_at(plc_sources(20.0, 40.0), at_millis(T0 + 1_000))
        .unwrap());
}

#[test]
fn remove_evicts_every_version_of_a_rule() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let hash = structure_hash(&definition.nodes).unwrap();

    let mut edited = definition.clone();
    edited.nodes[0].offset_y = 10.0;
    let edited_hash = structure_hash(&edited.nodes).unwrap();

    let original = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    cache.get_or_create("rule-1", &edited_hash, &edited).unwrap();
    cache.get_or_create("rule-2", &hash, &definition).unwrap();

    assert_eq!(cache.remove("rule-1"), 2);
    assert_eq!(cache.len(), 1);

    // Re-creating the rule yields a fresh instance with no snapshot memory.
    let recreated = cache.get_or_create("rule-1", &hash, &definition).unwrap();
    assert!(!Arc::ptr_eq(&original, &recreated));
}

#[test]
fn clear_empties_the_cache() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    cache.get_or_create_hashed("rule-1", &definition).unwrap();
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn malformed_hash_is_rejected() {
    let cache = GraphInstanceCache::new();
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE]);
    let result = cache.get_or_create("rule-1", "not-a-digest", &definition);
    assert!(matches!(
        result,
        Err(CacheError::Hash(HashError::InvalidFormat(_)))
    ));
}

#[test]
fn failed_construction_inserts_nothing() {
    let cache = GraphInstanceCache::new();
    // Two config nodes: construction must fail and the cache stay empty.
    let definition = GraphDefinition::new(vec![
        Node::provider(1, TEMPERATURE),
        Node::config(2, settings(DetectionMode::Or), vec![1]),
        Node::config(3, settings(DetectionMode::Or), vec![1]),
        Node::final_node(4, 2),
    ]);
    let hash = structure_hash(&definition.nodes).unwrap();
    let result = cache.get_or_create("rule-1", &hash, &definition);
    assert!(matches!(
        result,
        Err(CacheError::Construction(
            GraphConstructionError::DuplicateNode { .. }
        ))
    ));
    assert!(cache.is_empty());
}

#[test]
fn version_bound_evicts_the_least_recently_used_shape() {
    let cache = GraphInstanceCache::with_config(CacheConfig {
        max_versions_per_rule: 2,
    });
    let base = change_rule(DetectionMode::Or, &[TEMPERATURE]);

    let mut shapes = Vec::new();
    for offset in 0..3 {
        let mut shape = base.clone();
        shape.nodes[0].offset_x = offset as f64;
        let hash = structure_hash(&shape.nodes).unwrap();
        shapes.push((hash, shape));
    }

    let first = cache
        .get_or_create("rule-1", &shapes[0].0, &shapes[0].1)
        .unwrap();
    cache
        .get_or_create("rule-1", &shapes[1].0, &shapes[1].1)
        .unwrap();
    cache
        .get_or_create("rule-1", &shapes[2].0, &shapes[2].1)
        .unwrap();

    // The oldest shape was evicted; fetching it again builds a new instance.
    assert_eq!(cache.len(), 2);
    let refetched = cache
        .get_or_create("rule-1", &shapes[0].0, &shapes[0].1)
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &refetched));
}
