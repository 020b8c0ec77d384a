use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::config::{EdgeKind, EdgeStyleConfig};
use crate::ir::{Edge, Node, NodeId, Style};

use super::types::{EdgeAlignment, EdgeLayout, GridCell, NodeLayout, Position, RoutedEdge};

/// Fixed node box attached to every projected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub width: f32,
    pub height: f32,
}

pub fn cell_to_position(cell: GridCell, spacing: f32) -> Position {
    Position {
        x: cell.x as f32 * spacing,
        y: cell.y as f32 * spacing,
    }
}

/// Build the output record for one node; the caller's node is left untouched.
pub fn project_node(node: &Node, cell: GridCell, spacing: f32, size: NodeBox) -> NodeLayout {
    let mut data = node.data.clone();
    data.remove("position");

    let mut style = node.style.clone().unwrap_or_default();
    style.insert("width".to_string(), Value::String(px(size.width)));
    style.insert("height".to_string(), Value::String(px(size.height)));

    NodeLayout {
        id: node.id.clone(),
        data,
        position: cell_to_position(cell, spacing),
        style,
        cell,
    }
}

pub fn project_nodes(
    nodes: &[Node],
    cells: &HashMap<&NodeId, GridCell>,
    spacing: f32,
    size: NodeBox,
) -> Vec<NodeLayout> {
    nodes
        .iter()
        .map(|node| {
            let cell = cells.get(&node.id).copied();
            debug_assert!(cell.is_some(), "node {} has no grid cell", node.id);
            project_node(node, cell.unwrap_or_default(), spacing, size)
        })
        .collect()
}

/// Attach routing metadata to edges whose endpoints were both projected.
/// Edges with a missing endpoint are handed back unchanged.
pub fn project_edges(
    nodes: &[NodeLayout],
    edges: &[Edge],
    grid_size: f32,
    config: &EdgeStyleConfig,
) -> Vec<EdgeLayout> {
    let positions = position_index(nodes);
    edges
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let (Some(&source), Some(&target)) =
                (positions.get(&edge.source), positions.get(&edge.target))
            else {
                tracing::debug!(index, source = %edge.source, target = %edge.target, "edge endpoint not projected");
                return EdgeLayout::Unresolved(edge.clone());
            };
            let alignment = classify_alignment(source, target, grid_size);
            EdgeLayout::Routed(normalize_edge(edge, index, config, Some(alignment)))
        })
        .collect()
}

pub(crate) fn position_index(nodes: &[NodeLayout]) -> HashMap<&NodeId, Position> {
    nodes.iter().map(|node| (&node.id, node.position)).collect()
}

/// Endpoints count as aligned on an axis when they are within a quarter cell of each other.
pub fn classify_alignment(source: Position, target: Position, grid_size: f32) -> EdgeAlignment {
    let tolerance = grid_size / 4.0;
    let horizontal = (source.y - target.y).abs() < tolerance;
    let vertical = (source.x - target.x).abs() < tolerance;
    match (horizontal, vertical) {
        (true, true) => EdgeAlignment::Coincident,
        (true, false) => EdgeAlignment::Horizontal,
        (false, true) => EdgeAlignment::Vertical,
        (false, false) => EdgeAlignment::Offset,
    }
}

/// Routing type for an edge. Alignment does not change it yet: straight
/// edges are left to the renderer's own orthogonal routing.
pub fn routing_for(alignment: Option<EdgeAlignment>, configured: EdgeKind) -> EdgeKind {
    if let Some(alignment) = alignment {
        tracing::trace!(?alignment, ?configured, "edge routing");
    }
    configured
}

/// Give an edge its id, routing type and merged styles. Caller style values win.
/// A missing or empty caller id becomes `edge-{index}`; integer ids are rendered as text.
pub fn normalize_edge(
    edge: &Edge,
    index: usize,
    config: &EdgeStyleConfig,
    alignment: Option<EdgeAlignment>,
) -> RoutedEdge {
    let mut data = edge.data.clone();
    data.remove("type");

    RoutedEdge {
        source: edge.source.clone(),
        target: edge.target.clone(),
        id: edge
            .id
            .as_ref()
            .map(ToString::to_string)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("edge-{index}")),
        kind: routing_for(alignment, config.kind),
        style: edge_style(edge.style.as_ref(), config),
        label_style: label_style(edge.label_style.as_ref(), config),
        data,
        alignment,
    }
}

pub fn edge_style(caller: Option<&Style>, config: &EdgeStyleConfig) -> Style {
    let mut style = Style::new();
    style.insert("stroke".to_string(), Value::String(config.stroke.clone()));
    style.insert("strokeWidth".to_string(), number(config.stroke_width));
    if let Some(caller) = caller {
        for (key, value) in caller {
            if key == "stroke" && is_blank(value) {
                continue;
            }
            style.insert(key.clone(), value.clone());
        }
    }
    style
}

pub fn label_style(caller: Option<&Style>, config: &EdgeStyleConfig) -> Style {
    let label = &config.label;
    let mut style = Style::new();
    style.insert("fontSize".to_string(), Value::String(label.font_size.clone()));
    style.insert("fill".to_string(), Value::String(label.fill.clone()));
    style.insert("background".to_string(), Value::String(label.background.clone()));
    style.insert("padding".to_string(), Value::String(label.padding.clone()));
    style.insert("borderRadius".to_string(), Value::String(label.border_radius.clone()));
    if let Some(caller) = caller {
        style.extend(caller.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    style
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}

/// Whole numbers are written as JSON integers.
fn number(value: f32) -> Value {
    if value.is_finite() && value.fract() == 0.0 {
        return Value::from(value as i64);
    }
    Number::from_f64(value as f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
