//! Validator and construction error suite.
mod common;
use common::*;
use henka::prelude::*;

fn or_config(id: NodeId, inputs: Vec<NodeId>) -> Node {
    Node::config(id, settings(DetectionMode::Or), inputs)
}

#[test]
fn valid_change_rule_has_no_errors() {
    let definition = change_rule(DetectionMode::Or, &[TEMPERATURE, HUMIDITY]);
    assert!(validate_graph(&definition.nodes).is_empty());
}

#[test]
fn cycle_is_reported_with_node_ids() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::final_node(3, 2),
        Node::logic(10, Operator::Not, vec![11]),
        Node::logic(11, Operator::Not, vec![10]),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors.contains(&ValidationError::CycleDetected {
        node_ids: vec![10, 11]
    }));
}

#[test]
fn missing_final_node_is_reported() {
    let nodes = vec![Node::provider(1, TEMPERATURE), or_config(2, vec![1])];
    let errors = validate_graph(&nodes);
    assert!(errors.contains(&ValidationError::FinalNodeMissing));
}

#[test]
fn duplicate_final_nodes_are_reported() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::final_node(3, 2),
        Node::final_node(4, 2),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors.contains(&ValidationError::FinalNodeDuplicate {
        node_ids: vec![3, 4]
    }));
}

#[test]
fn config_node_count_is_checked() {
    let without = vec![
        Node::constant(1, Value::Bool(true)),
        Node::final_node(2, 1),
    ];
    assert!(validate_graph(&without).contains(&ValidationError::ConfigNodeMissing));

    let with_two = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        or_config(3, vec![1]),
        Node::final_node(4, 2),
    ];
    assert!(
        validate_graph(&with_two).contains(&ValidationError::ConfigNodeDuplicate {
            node_ids: vec![2, 3]
        })
    );
}

#[test]
fn final_node_requires_boolean_input() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::constant(3, Value::Number(42.0)),
        Node::final_node(4, 3),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::FinalNodeInput { node_id: 4, .. })));
}

#[test]
fn operator_arity_is_checked() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::constant(3, Value::Bool(true)),
        Node::logic(4, Operator::And, vec![3]),
        Node::final_node(5, 4),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::OperatorConfig { node_id: 4, .. })));
}

#[test]
fn between_bounds_must_be_ordered_constants() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::constant(3, Value::Number(10.0)),
        Node::constant(4, Value::Number(5.0)),
        Node::logic(5, Operator::Between, vec![1, 3, 4]),
        Node::final_node(6, 5),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::OperatorConfig { node_id: 5, .. })));
}

#[test]
fn comparison_allows_at_most_one_dynamic_input() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        Node::provider(2, HUMIDITY),
        or_config(3, vec![1]),
        Node::logic(4, Operator::NotEquals, vec![1, 2]),
        Node::final_node(5, 4),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::OperatorConfig { node_id: 4, .. })));
}

#[test]
fn set_membership_requires_a_constant_array() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::constant(3, Value::Number(7.0)),
        Node::logic(4, Operator::NotInSet, vec![1, 3]),
        Node::final_node(5, 4),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::OperatorConfig { node_id: 4, .. })));
}

#[test]
fn invalid_regex_pattern_is_reported_at_validation() {
    let nodes = vec![
        Node::provider(1, "source.plc.serial"),
        or_config(2, vec![1]),
        Node::constant(3, Value::Text("[unclosed".to_string())),
        Node::logic(4, Operator::RegexMatch, vec![1, 3]),
        Node::final_node(5, 4),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::OperatorConfig { node_id: 4, .. })));
}

#[test]
fn malformed_provider_path_is_reported() {
    let nodes = vec![
        Node::provider(1, "sensors.temperature"),
        or_config(2, vec![1]),
        Node::final_node(3, 2),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::NodeConfig { node_id: 1, .. })));
}

#[test]
fn dangling_input_reference_is_reported() {
    let nodes = vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        Node::logic(4, Operator::Not, vec![99]),
        Node::final_node(5, 4),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::NodeConfig { node_id: 4, .. })));
}

#[test]
fn config_inputs_must_be_providers() {
    let nodes = vec![
        Node::constant(1, Value::Number(1.0)),
        or_config(2, vec![1]),
        Node::final_node(3, 2),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::NodeConfig { node_id: 2, .. })));
}

#[test]
fn errors_accumulate_instead_of_short_circuiting() {
    // No config node, two final nodes, and a bad operator all at once.
    let nodes = vec![
        Node::constant(1, Value::Bool(true)),
        Node::logic(2, Operator::Not, vec![]),
        Node::final_node(3, 1),
        Node::final_node(4, 1),
    ];
    let errors = validate_graph(&nodes);
    assert!(errors.len() >= 3);
}

// --- Construction errors ---

#[test]
fn empty_definition_is_rejected() {
    let result = StatefulLogicGraph::new(GraphDefinition::default());
    assert_eq!(result.err(), Some(GraphConstructionError::EmptyGraph));
}

#[test]
fn duplicate_node_ids_are_rejected() {
    let definition = GraphDefinition::new(vec![
        Node::provider(1, TEMPERATURE),
        Node::provider(1, HUMIDITY),
    ]);
    assert!(matches!(
        StatefulLogicGraph::new(definition),
        Err(GraphConstructionError::DuplicateNode { node_id: 1, .. })
    ));
}

#[test]
fn dangling_input_reference_is_rejected() {
    let definition = GraphDefinition::new(vec![
        Node::provider(1, TEMPERATURE),
        Node::config(2, settings(DetectionMode::Or), vec![1, 42]),
        Node::final_node(3, 2),
    ]);
    assert_eq!(
        StatefulLogicGraph::new(definition).err(),
        Some(GraphConstructionError::NullInput {
            node_id: 2,
            input_id: 42
        })
    );
}

#[test]
fn missing_config_node_is_rejected() {
    let definition = GraphDefinition::new(vec![
        Node::constant(1, Value::Bool(true)),
        Node::final_node(2, 1),
    ]);
    assert_eq!(
        StatefulLogicGraph::new(definition).err(),
        Some(GraphConstructionError::MissingRequiredNode {
            kind: "change-detection"
        })
    );
}

#[test]
fn two_config_nodes_raise_duplicate_node() {
    let definition = GraphDefinition::new(vec![
        Node::provider(1, TEMPERATURE),
        or_config(2, vec![1]),
        or_config(3, vec![1]),
        Node::final_node(4, 2),
    ]);
    assert!(matches!(
        StatefulLogicGraph::new(definition),
        Err(GraphConstructionError::DuplicateNode { node_id: 3, .. })
    ));
}
