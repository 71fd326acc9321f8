use crate::graph::{Node, NodeId};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// A dependency cycle found while ordering the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Ids of the nodes participating in the cycle, ascending.
    pub node_ids: Vec<NodeId>,
}

/// Orders the nodes so that every node follows all of its inputs.
///
/// Kahn's algorithm in O(V+E). The ready set is drained in ascending node id
/// order, so repeated sorts of an unchanged graph yield the same order.
/// Input references that do not resolve to a node are skipped here; the
/// validator reports them separately.
pub fn topological_order(nodes: &[Node]) -> Result<Vec<NodeId>, Cycle> {
    let known: BTreeSet<NodeId> = nodes.iter().map(|node| node.id).collect();

    let mut in_degree: AHashMap<NodeId, usize> = AHashMap::with_capacity(nodes.len());
    let mut dependents: AHashMap<NodeId, Vec<NodeId>> = AHashMap::new();
    for node in nodes {
        let resolved = node
            .inputs
            .iter()
            .filter(|input| known.contains(input))
            .count();
        in_degree.insert(node.id, resolved);
        for input in &node.inputs {
            if known.contains(input) {
                dependents.entry(*input).or_default().push(node.id);
            }
        }
    }

    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(id) = ready.pop_first() {
        order.push(id);
        if let Some(next) = dependents.get(&id) {
            for dependent in next {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }
    }

    if order.len() == nodes.len() {
        Ok(order)
    } else {
        let node_ids: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree > 0)
            .map(|(id, _)| *id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Err(Cycle { node_ids })
    }
}
