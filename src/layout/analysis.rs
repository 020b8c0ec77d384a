use std::collections::HashMap;

use crate::config::UnknownEdgePolicy;
use crate::ir::{Edge, Node, NodeId};

use super::error::{EdgeEnd, LayoutError};

/// Adjacency and degree maps for one layout call.
///
/// Every map is total over the input node ids, whether or not a node takes
/// part in any edge. Successor lists keep edge input order.
#[derive(Debug, Clone)]
pub struct GraphAnalysis<'a> {
    pub order: Vec<&'a NodeId>,
    pub adjacency: HashMap<&'a NodeId, Vec<&'a NodeId>>,
    pub in_degree: HashMap<&'a NodeId, usize>,
    pub out_degree: HashMap<&'a NodeId, usize>,
    /// Nodes with in-degree 0, in input order.
    pub roots: Vec<&'a NodeId>,
    /// Nodes with out-degree 0, in input order.
    pub leaves: Vec<&'a NodeId>,
    /// Where traversal begins: the roots, or the minimum in-degree nodes when there are none.
    pub start_nodes: Vec<&'a NodeId>,
    pub root_fallback: bool,
    /// Indices of edges left out under [`UnknownEdgePolicy::Skip`].
    pub skipped_edges: Vec<usize>,
}

impl<'a> GraphAnalysis<'a> {
    pub fn successors(&self, id: &NodeId) -> &[&'a NodeId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn analyze_graph<'a>(
    nodes: &'a [Node],
    edges: &'a [Edge],
    policy: UnknownEdgePolicy,
) -> Result<GraphAnalysis<'a>, LayoutError> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::with_capacity(nodes.len());
    let mut in_degree: HashMap<&NodeId, usize> = HashMap::with_capacity(nodes.len());
    let mut out_degree: HashMap<&NodeId, usize> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        if adjacency.insert(&node.id, Vec::new()).is_some() {
            return Err(LayoutError::DuplicateNode(node.id.clone()));
        }
        in_degree.insert(&node.id, 0);
        out_degree.insert(&node.id, 0);
        order.push(&node.id);
    }

    let mut skipped_edges = Vec::new();
    for (index, edge) in edges.iter().enumerate() {
        if let Some((end, node)) = unknown_endpoint(edge, &adjacency) {
            match policy {
                UnknownEdgePolicy::Reject => {
                    return Err(LayoutError::UnknownEdgeEndpoint {
                        index,
                        end,
                        node: node.clone(),
                    });
                }
                UnknownEdgePolicy::Skip => {
                    tracing::warn!(index, %end, node = %node, "skipping edge with unknown endpoint");
                    skipped_edges.push(index);
                    continue;
                }
            }
        }
        if let Some(successors) = adjacency.get_mut(&edge.source) {
            successors.push(&edge.target);
        }
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
        if let Some(degree) = out_degree.get_mut(&edge.source) {
            *degree += 1;
        }
    }

    let roots: Vec<&NodeId> = order
        .iter()
        .copied()
        .filter(|id| in_degree[id] == 0)
        .collect();
    let leaves: Vec<&NodeId> = order
        .iter()
        .copied()
        .filter(|id| out_degree[id] == 0)
        .collect();

    let root_fallback = roots.is_empty() && !order.is_empty();
    let start_nodes = if root_fallback {
        let min = in_degree.values().copied().min().unwrap_or(0);
        order
            .iter()
            .copied()
            .filter(|id| in_degree[id] == min)
            .collect()
    } else {
        roots.clone()
    };

    tracing::debug!(
        nodes = order.len(),
        edges = edges.len() - skipped_edges.len(),
        roots = roots.len(),
        leaves = leaves.len(),
        root_fallback,
        "analyzed graph"
    );

    Ok(GraphAnalysis {
        order,
        adjacency,
        in_degree,
        out_degree,
        roots,
        leaves,
        start_nodes,
        root_fallback,
        skipped_edges,
    })
}

fn unknown_endpoint<'e>(
    edge: &'e Edge,
    known: &HashMap<&NodeId, Vec<&NodeId>>,
) -> Option<(EdgeEnd, &'e NodeId)> {
    if !known.contains_key(&edge.source) {
        return Some((EdgeEnd::Source, &edge.source));
    }
    if !known.contains_key(&edge.target) {
        return Some((EdgeEnd::Target, &edge.target));
    }
    None
}
