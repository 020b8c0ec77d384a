use crate::ir::Direction;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GRID_SIZE: f32 = 150.0;
pub const DEFAULT_NODE_WIDTH: f32 = 120.0;
pub const DEFAULT_NODE_HEIGHT: f32 = 60.0;
pub const DEFAULT_EDGE_STROKE: &str = "#64748b";
pub const DEFAULT_EDGE_STROKE_WIDTH: f32 = 2.0;

/// What the grid strategy does with an edge whose endpoint is not a known node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownEdgePolicy {
    /// Fail the whole layout before traversal starts.
    #[default]
    Reject,
    /// Leave the edge out of the adjacency maps; it is emitted unpositioned.
    Skip,
}

/// Routing type attached to every emitted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Smoothstep,
    Step,
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub grid_size: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Advisory only: root detection always runs.
    pub start_from_root: bool,
    pub direction: Direction,
    pub unknown_edges: UnknownEdgePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            start_from_root: true,
            direction: Direction::LeftRight,
            unknown_edges: UnknownEdgePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimpleGridConfig {
    /// `None` means `ceil(sqrt(node count))`.
    pub columns: Option<usize>,
    pub grid_spacing: f32,
    pub node_width: f32,
    pub node_height: f32,
}

impl Default for SimpleGridConfig {
    fn default() -> Self {
        Self {
            columns: None,
            grid_spacing: DEFAULT_GRID_SIZE,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
        }
    }
}

impl SimpleGridConfig {
    pub fn columns_for(&self, node_count: usize) -> usize {
        self.columns
            .unwrap_or_else(|| (node_count as f64).sqrt().ceil() as usize)
            .max(1)
    }
}

#[derive(Debug, Clone)]
pub struct LabelStyleConfig {
    pub font_size: String,
    pub fill: String,
    pub background: String,
    pub padding: String,
    pub border_radius: String,
}

impl Default for LabelStyleConfig {
    fn default() -> Self {
        Self {
            font_size: "10px".to_string(),
            fill: "#374151".to_string(),
            background: "white".to_string(),
            padding: "2px 4px".to_string(),
            border_radius: "3px".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EdgeStyleConfig {
    pub stroke: String,
    pub stroke_width: f32,
    pub kind: EdgeKind,
    pub label: LabelStyleConfig,
}

impl Default for EdgeStyleConfig {
    fn default() -> Self {
        Self {
            stroke: DEFAULT_EDGE_STROKE.to_string(),
            stroke_width: DEFAULT_EDGE_STROKE_WIDTH,
            kind: EdgeKind::Smoothstep,
            label: LabelStyleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub grid: GridConfig,
    pub simple: SimpleGridConfig,
    pub edges: EdgeStyleConfig,
}

impl Config {
    /// Overlay per-document or command-line options. Invalid sizes keep the current value.
    pub fn apply_options(&mut self, options: &LayoutOptions) {
        if let Some(v) = positive(options.grid_size) {
            self.grid.grid_size = v;
        }
        if let Some(v) = positive(options.grid_spacing) {
            self.simple.grid_spacing = v;
        }
        if let Some(v) = positive(options.node_width) {
            self.grid.node_width = v;
            self.simple.node_width = v;
        }
        if let Some(v) = positive(options.node_height) {
            self.grid.node_height = v;
            self.simple.node_height = v;
        }
        if let Some(v) = options.start_from_root {
            self.grid.start_from_root = v;
        }
        if let Some(v) = options.direction {
            self.grid.direction = v;
        }
        if let Some(v) = options.columns {
            self.simple.columns = Some(v.max(1));
        }
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Flat option block, using the option names the rendering front end sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub grid_size: Option<f32>,
    pub node_width: Option<f32>,
    pub node_height: Option<f32>,
    pub start_from_root: Option<bool>,
    pub direction: Option<Direction>,
    pub columns: Option<usize>,
    pub grid_spacing: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    grid: Option<GridConfigFile>,
    simple: Option<SimpleGridConfigFile>,
    edges: Option<EdgeStyleConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    grid_size: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    start_from_root: Option<bool>,
    direction: Option<Direction>,
    unknown_edges: Option<UnknownEdgePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SimpleGridConfigFile {
    columns: Option<usize>,
    grid_spacing: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct EdgeStyleConfigFile {
    stroke: Option<String>,
    stroke_width: Option<f32>,
    kind: Option<EdgeKind>,
    label: Option<LabelStyleConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelStyleConfigFile {
    font_size: Option<String>,
    fill: Option<String>,
    background: Option<String>,
    padding: Option<String>,
    border_radius: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(grid) = parsed.grid {
        if let Some(v) = positive(grid.grid_size) {
            config.grid.grid_size = v;
        }
        if let Some(v) = positive(grid.node_width) {
            config.grid.node_width = v;
        }
        if let Some(v) = positive(grid.node_height) {
            config.grid.node_height = v;
        }
        if let Some(v) = grid.start_from_root {
            config.grid.start_from_root = v;
        }
        if let Some(v) = grid.direction {
            config.grid.direction = v;
        }
        if let Some(v) = grid.unknown_edges {
            config.grid.unknown_edges = v;
        }
    }

    if let Some(simple) = parsed.simple {
        if let Some(v) = simple.columns {
            config.simple.columns = Some(v.max(1));
        }
        if let Some(v) = positive(simple.grid_spacing) {
            config.simple.grid_spacing = v;
        }
        if let Some(v) = positive(simple.node_width) {
            config.simple.node_width = v;
        }
        if let Some(v) = positive(simple.node_height) {
            config.simple.node_height = v;
        }
    }

    if let Some(edges) = parsed.edges {
        if let Some(v) = edges.stroke {
            config.edges.stroke = v;
        }
        if let Some(v) = positive(edges.stroke_width) {
            config.edges.stroke_width = v;
        }
        if let Some(v) = edges.kind {
            config.edges.kind = v;
        }
        if let Some(label) = edges.label {
            if let Some(v) = label.font_size {
                config.edges.label.font_size = v;
            }
            if let Some(v) = label.fill {
                config.edges.label.fill = v;
            }
            if let Some(v) = label.background {
                config.edges.label.background = v;
            }
            if let Some(v) = label.padding {
                config.edges.label.padding = v;
            }
            if let Some(v) = label.border_radius {
                config.edges.label.border_radius = v;
            }
        }
    }

    Ok(config)
}
