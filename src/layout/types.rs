use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::EdgeKind;
use crate::ir::{Edge, NodeId, Style};

/// Integer cell on the unbounded placement grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

impl GridCell {
    pub const ORIGIN: GridCell = GridCell { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Canonical `x,y` key form of a cell.
impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: NodeId,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    pub position: Position,
    pub style: Style,
    #[serde(skip)]
    pub cell: GridCell,
}

/// How the two endpoints of an edge line up in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeAlignment {
    /// Same row and same column (self loop).
    Coincident,
    Horizontal,
    Vertical,
    /// Needs at least one bend.
    Offset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub style: Style,
    pub label_style: Style,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    /// `None` when an endpoint has no position (simple strategy only).
    #[serde(skip)]
    pub alignment: Option<EdgeAlignment>,
}

/// Edges whose endpoints could not be resolved are handed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeLayout {
    Routed(RoutedEdge),
    Unresolved(Edge),
}

impl EdgeLayout {
    pub fn routed(&self) -> Option<&RoutedEdge> {
        match self {
            Self::Routed(edge) => Some(edge),
            Self::Unresolved(_) => None,
        }
    }

    pub fn source(&self) -> &NodeId {
        match self {
            Self::Routed(edge) => &edge.source,
            Self::Unresolved(edge) => &edge.source,
        }
    }

    pub fn target(&self) -> &NodeId {
        match self {
            Self::Routed(edge) => &edge.target,
            Self::Unresolved(edge) => &edge.target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    #[default]
    Grid,
    Simple,
}

/// Topology facts gathered while laying out; not part of the rendered output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub strategy: LayoutStrategy,
    pub roots: Vec<NodeId>,
    pub leaves: Vec<NodeId>,
    pub start_nodes: Vec<NodeId>,
    pub root_fallback: bool,
    pub orphans: Vec<NodeId>,
    pub skipped_edges: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    #[serde(skip)]
    pub summary: LayoutSummary,
}

impl Layout {
    pub fn node(&self, id: &NodeId) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| &node.id == id)
    }
}
