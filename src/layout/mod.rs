pub mod analysis;
mod error;
pub mod placement;
pub mod projection;
pub mod simple_grid;
pub(crate) mod types;
pub use error::{EdgeEnd, LayoutError};
pub use types::*;

use analysis::analyze_graph;
use placement::place_nodes;
use projection::{NodeBox, project_edges, project_nodes};
use simple_grid::compute_simple_grid_layout;

use crate::config::{Config, EdgeStyleConfig, GridConfig, SimpleGridConfig};
use crate::ir::Graph;

pub fn compute_layout(
    graph: &Graph,
    config: &Config,
    strategy: LayoutStrategy,
) -> Result<Layout, LayoutError> {
    match strategy {
        LayoutStrategy::Grid => layout_graph_grid(graph, &config.grid, &config.edges),
        LayoutStrategy::Simple => Ok(layout_graph_simple_grid(
            graph,
            &config.simple,
            &config.edges,
        )),
    }
}

/// Graph-aware placement: analyze, place on the grid, project to pixels.
pub fn layout_graph_grid(
    graph: &Graph,
    config: &GridConfig,
    edge_config: &EdgeStyleConfig,
) -> Result<Layout, LayoutError> {
    if !config.start_from_root {
        tracing::warn!("startFromRoot=false is advisory; traversal still starts from root nodes");
    }

    let analysis = analyze_graph(&graph.nodes, &graph.edges, config.unknown_edges)?;
    let placement = place_nodes(&analysis, config.direction);

    let size = NodeBox {
        width: config.node_width,
        height: config.node_height,
    };
    let nodes = project_nodes(&graph.nodes, &placement.cells, config.grid_size, size);
    let edges = project_edges(&nodes, &graph.edges, config.grid_size, edge_config);

    let summary = LayoutSummary {
        strategy: LayoutStrategy::Grid,
        roots: analysis.roots.iter().map(|id| (*id).clone()).collect(),
        leaves: analysis.leaves.iter().map(|id| (*id).clone()).collect(),
        start_nodes: analysis.start_nodes.iter().map(|id| (*id).clone()).collect(),
        root_fallback: analysis.root_fallback,
        orphans: placement.orphans.iter().map(|id| (*id).clone()).collect(),
        skipped_edges: analysis.skipped_edges.clone(),
    };

    Ok(Layout {
        nodes,
        edges,
        summary,
    })
}

/// Edge-blind tiling. Never fails.
pub fn layout_graph_simple_grid(
    graph: &Graph,
    config: &SimpleGridConfig,
    edge_config: &EdgeStyleConfig,
) -> Layout {
    compute_simple_grid_layout(graph, config, edge_config)
}
