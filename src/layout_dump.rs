use crate::ir::NodeId;
use crate::layout::{EdgeAlignment, EdgeLayout, Layout, LayoutStrategy};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Debug view of a layout: grid cells next to pixel positions, plus the
/// topology facts gathered on the way.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub strategy: LayoutStrategy,
    pub roots: Vec<NodeId>,
    pub leaves: Vec<NodeId>,
    pub start_nodes: Vec<NodeId>,
    pub root_fallback: bool,
    pub orphans: Vec<NodeId>,
    pub skipped_edges: Vec<usize>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub cell: String,
    pub grid_x: i64,
    pub grid_y: i64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: Option<String>,
    pub source: NodeId,
    pub target: NodeId,
    pub resolved: bool,
    pub alignment: Option<EdgeAlignment>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                cell: node.cell.to_string(),
                grid_x: node.cell.x,
                grid_y: node.cell.y,
                x: node.position.x,
                y: node.position.y,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| {
                let routed = edge.routed();
                EdgeDump {
                    id: match edge {
                        EdgeLayout::Routed(routed) => Some(routed.id.clone()),
                        EdgeLayout::Unresolved(raw) => raw.id.as_ref().map(ToString::to_string),
                    },
                    source: edge.source().clone(),
                    target: edge.target().clone(),
                    resolved: routed.is_some(),
                    alignment: routed.and_then(|r| r.alignment),
                }
            })
            .collect();

        let summary = &layout.summary;
        LayoutDump {
            strategy: summary.strategy,
            roots: summary.roots.clone(),
            leaves: summary.leaves.clone(),
            start_nodes: summary.start_nodes.clone(),
            root_fallback: summary.root_fallback,
            orphans: summary.orphans.clone(),
            skipped_edges: summary.skipped_edges.clone(),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
