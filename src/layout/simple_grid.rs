//! Edge-blind fallback: nodes are tiled row by row in input order.

use crate::config::{EdgeStyleConfig, SimpleGridConfig};
use crate::ir::Graph;

use super::projection::{NodeBox, classify_alignment, normalize_edge, position_index, project_node};
use super::types::{EdgeLayout, GridCell, Layout, LayoutStrategy, LayoutSummary};

pub fn simple_grid_cell(index: usize, columns: usize) -> GridCell {
    let columns = columns.max(1);
    GridCell::new((index % columns) as i64, (index / columns) as i64)
}

pub fn compute_simple_grid_layout(
    graph: &Graph,
    config: &SimpleGridConfig,
    edge_config: &EdgeStyleConfig,
) -> Layout {
    let columns = config.columns_for(graph.nodes.len());
    let size = NodeBox {
        width: config.node_width,
        height: config.node_height,
    };

    let nodes: Vec<_> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            project_node(node, simple_grid_cell(index, columns), config.grid_spacing, size)
        })
        .collect();

    // Every edge is styled, even one whose endpoints are unknown.
    let positions = position_index(&nodes);
    let edges = graph
        .edges
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let alignment = match (positions.get(&edge.source), positions.get(&edge.target)) {
                (Some(&source), Some(&target)) => {
                    Some(classify_alignment(source, target, config.grid_spacing))
                }
                _ => None,
            };
            EdgeLayout::Routed(normalize_edge(edge, index, edge_config, alignment))
        })
        .collect();

    tracing::debug!(nodes = nodes.len(), columns, "simple grid layout done");

    Layout {
        nodes,
        edges,
        summary: LayoutSummary {
            strategy: LayoutStrategy::Simple,
            ..LayoutSummary::default()
        },
    }
}
