#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutOptions, UnknownEdgePolicy, load_config};
pub use ir::{Direction, Edge, EdgeId, Graph, GraphDocument, Node, NodeId};
pub use layout::{
    Layout, LayoutError, LayoutStrategy, compute_layout, layout_graph_grid,
    layout_graph_simple_grid,
};
