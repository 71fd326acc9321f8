//! Structural validation of a rule graph.
//!
//! Validation accumulates every finding rather than stopping at the first,
//! so a rule editor can present the complete error list. An error-free
//! graph may be finalized by the caller; a graph with errors stays a draft.

use crate::error::ValidationError;
use crate::graph::{node_index, topo, Node, NodeId, NodeKind};
use crate::path::ProviderPath;
use crate::value::ValueType;
use tracing::debug;

/// Runs every structural check and returns the accumulated findings.
/// An empty list means the graph is sound.
pub fn validate_graph(nodes: &[Node]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let index = node_index(nodes);

    if let Err(cycle) = topo::topological_order(nodes) {
        errors.push(ValidationError::CycleDetected {
            node_ids: cycle.node_ids,
        });
    }

    check_final_node(nodes, &mut errors);
    check_config_node(nodes, &mut errors);

    for node in nodes {
        for input in &node.inputs {
            if !index.contains_key(input) {
                errors.push(ValidationError::NodeConfig {
                    node_id: node.id,
                    name: node.name.clone(),
                    message: format!("input reference {} does not resolve to a node", input),
                });
            }
        }

        match &node.kind {
            NodeKind::Provider { path, .. } => {
                if let Err(e) = ProviderPath::parse(path) {
                    errors.push(ValidationError::NodeConfig {
                        node_id: node.id,
                        name: node.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
            NodeKind::Logic { operator } => {
                if let Err(e) = operator.validate(node, &index) {
                    errors.push(e);
                }
            }
            NodeKind::Config(settings) => {
                if settings.time_window_enabled && settings.time_window_millis == 0 {
                    errors.push(ValidationError::NodeConfig {
                        node_id: node.id,
                        name: node.name.clone(),
                        message: "time window is enabled but its length is zero".to_string(),
                    });
                }
                for input in &node.inputs {
                    if let Some(source) = index.get(input) {
                        if !source.is_provider() {
                            errors.push(ValidationError::NodeConfig {
                                node_id: node.id,
                                name: node.name.clone(),
                                message: format!(
                                    "change detection only reads provider nodes, but input {} is not one",
                                    input
                                ),
                            });
                        }
                    }
                }
            }
            NodeKind::Constant { .. } | NodeKind::Final => {}
        }
    }

    debug!(
        nodes = nodes.len(),
        errors = errors.len(),
        "graph validation finished"
    );
    errors
}

fn check_final_node(nodes: &[Node], errors: &mut Vec<ValidationError>) {
    let finals: Vec<&Node> = nodes.iter().filter(|node| node.is_final()).collect();
    match finals.as_slice() {
        [] => errors.push(ValidationError::FinalNodeMissing),
        [final_node] => {
            if nodes.len() > 1 {
                check_final_input(final_node, nodes, errors);
            }
        }
        many => errors.push(ValidationError::FinalNodeDuplicate {
            node_ids: many.iter().map(|node| node.id).collect(),
        }),
    }
}

fn check_final_input(final_node: &Node, nodes: &[Node], errors: &mut Vec<ValidationError>) {
    let index = node_index(nodes);
    match final_node.inputs.as_slice() {
        [input] => {
            if let Some(source) = index.get(input) {
                let return_type = source.static_return_type();
                if return_type != ValueType::Bool && return_type != ValueType::Any {
                    errors.push(ValidationError::FinalNodeInput {
                        node_id: final_node.id,
                        message: format!(
                            "input node {} produces {}, but the final node requires a boolean",
                            input, return_type
                        ),
                    });
                }
            }
        }
        inputs => errors.push(ValidationError::FinalNodeInput {
            node_id: final_node.id,
            message: format!("requires exactly one input, but has {}", inputs.len()),
        }),
    }
}

fn check_config_node(nodes: &[Node], errors: &mut Vec<ValidationError>) {
    let configs: Vec<NodeId> = nodes
        .iter()
        .filter(|node| node.is_config())
        .map(|node| node.id)
        .collect();
    match configs.as_slice() {
        [] => errors.push(ValidationError::ConfigNodeMissing),
        [_] => {}
        many => errors.push(ValidationError::ConfigNodeDuplicate {
            node_ids: many.to_vec(),
        }),
    }
}
