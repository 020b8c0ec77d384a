use std::collections::HashSet;
use std::path::Path;

use serde_json::json;
use upgrade_grid::config::EdgeStyleConfig;
use upgrade_grid::layout::{EdgeLayout, GridCell};
use upgrade_grid::{
    Config, Direction, Edge, Graph, GraphDocument, Layout, LayoutError, LayoutStrategy, NodeId,
    UnknownEdgePolicy, compute_layout, layout_graph_grid,
};

fn load_fixture(name: &str) -> (Graph, Config) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let document = GraphDocument::from_json(&input).expect("fixture parse failed");
    let mut config = Config::default();
    if let Some(options) = &document.options {
        config.apply_options(options);
    }
    (document.graph, config)
}

fn cell_of(layout: &Layout, id: impl Into<NodeId>) -> GridCell {
    layout.node(&id.into()).expect("node missing").cell
}

fn assert_unique_and_total(graph: &Graph, layout: &Layout) {
    let ids: Vec<&NodeId> = layout.nodes.iter().map(|n| &n.id).collect();
    let expected: Vec<&NodeId> = graph.nodes.iter().map(|n| &n.id).collect();
    assert_eq!(ids, expected, "output must keep input order");
    let cells: HashSet<GridCell> = layout.nodes.iter().map(|n| n.cell).collect();
    assert_eq!(cells.len(), graph.nodes.len(), "two nodes share a cell");
}

/// Deterministic pseudo-random graph with back edges and isolated nodes.
fn scrambled_graph(nodes: usize, edges: usize, seed: u64) -> Graph {
    let mut state = seed;
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % bound
    };
    let mut graph = Graph::new();
    for i in 0..nodes {
        graph.add_node(format!("n{i}"));
    }
    for _ in 0..edges {
        let from = next(nodes);
        let to = next(nodes);
        graph.add_edge(format!("n{from}"), format!("n{to}"));
    }
    graph
}

#[test]
fn tank_tree_fixture() {
    let (graph, config) = load_fixture("tank_tree.json");
    let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();
    assert_unique_and_total(&graph, &layout);

    assert_eq!(cell_of(&layout, "m4"), GridCell::new(0, 0));
    assert_eq!(cell_of(&layout, "m4a1"), GridCell::new(1, -1));
    assert_eq!(cell_of(&layout, "m4a3"), GridCell::new(1, 0));
    assert_eq!(cell_of(&layout, "m4a3e8"), GridCell::new(1, 1));
    assert_eq!(cell_of(&layout, "m26"), GridCell::new(2, 1));
    assert_eq!(cell_of(&layout, "m46"), GridCell::new(3, 1));

    let output = serde_json::to_value(&layout).unwrap();
    let m4 = &output["nodes"][0];
    assert_eq!(m4["id"], json!("m4"));
    assert_eq!(m4["label"], json!("M4 Sherman"));
    assert_eq!(m4["data"], json!({"tier": 1}));
    assert_eq!(m4["position"], json!({"x": 0.0, "y": 0.0}));
    assert_eq!(m4["style"], json!({"width": "120px", "height": "60px"}));

    let m4a1 = &output["nodes"][1];
    assert_eq!(m4a1["position"], json!({"x": 150.0, "y": -150.0}));
    assert_eq!(m4a1["style"]["background"], json!("#e0f2fe"));

    let edges = output["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 5);
    assert_eq!(edges[0]["id"], json!("edge-0"));
    assert_eq!(edges[0]["label"], json!("research"));
    assert_eq!(edges[0]["type"], json!("smoothstep"));
    assert_eq!(edges[2]["style"]["stroke"], json!("red"));
    assert_eq!(edges[2]["style"]["strokeWidth"], json!(2));
    assert_eq!(edges[3]["id"], json!("e8-to-pershing"));
    assert_eq!(edges[3]["labelStyle"]["fill"], json!("#111827"));
    assert_eq!(edges[3]["labelStyle"]["fontSize"], json!("10px"));
    assert_eq!(edges[4]["style"]["stroke"], json!("#64748b"));
}

#[test]
fn document_options_switch_direction_and_spacing() {
    let (graph, config) = load_fixture("two_lines.json");
    assert_eq!(config.grid.direction, Direction::TopDown);
    let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();
    assert_unique_and_total(&graph, &layout);

    assert_eq!(cell_of(&layout, NodeId::Number(1)), GridCell::new(0, 0));
    assert_eq!(cell_of(&layout, NodeId::Number(10)), GridCell::new(2, 0));
    assert_eq!(cell_of(&layout, NodeId::Number(99)), GridCell::new(4, 0));
    assert_eq!(cell_of(&layout, NodeId::Number(3)), GridCell::new(0, 2));
    assert_eq!(cell_of(&layout, NodeId::Number(11)), GridCell::new(1, 1));
    assert_eq!(cell_of(&layout, NodeId::Number(12)), GridCell::new(2, 1));

    let twelve = layout.node(&NodeId::Number(12)).unwrap();
    assert_eq!(twelve.position.x, 400.0);
    assert_eq!(twelve.position.y, 200.0);
    assert_eq!(twelve.style["width"], json!("100px"));

    let output = serde_json::to_value(&layout).unwrap();
    assert_eq!(output["nodes"][0]["id"], json!(1));
    assert_eq!(output["edges"][0]["source"], json!(1));
}

#[test]
fn cycle_uses_root_fallback() {
    let (graph, config) = load_fixture("cycle.json");
    let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();
    assert_unique_and_total(&graph, &layout);
    assert!(layout.summary.roots.is_empty());
    assert!(layout.summary.root_fallback);
    assert_eq!(
        layout.summary.start_nodes,
        vec![NodeId::from("X"), NodeId::from("Y")]
    );
    assert!(layout.summary.orphans.is_empty());
}

#[test]
fn dangling_edge_policies() {
    let (graph, config) = load_fixture("dangling_edge.json");

    let err = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap_err();
    assert!(matches!(err, LayoutError::UnknownEdgeEndpoint { index: 1, .. }));
    assert_eq!(
        err.to_string(),
        "edge 1 references unknown target node 'missing'"
    );

    let mut skipping = config.clone();
    skipping.grid.unknown_edges = UnknownEdgePolicy::Skip;
    let layout = compute_layout(&graph, &skipping, LayoutStrategy::Grid).unwrap();
    assert_unique_and_total(&graph, &layout);
    assert!(layout.edges[0].routed().is_some());
    assert_eq!(layout.edges[1], EdgeLayout::Unresolved(graph.edges[1].clone()));
    let passthrough = serde_json::to_value(&layout.edges[1]).unwrap();
    assert_eq!(
        passthrough,
        json!({"source": "B", "target": "missing", "id": "dangling", "style": {"stroke": "red"}})
    );

    let simple = compute_layout(&graph, &config, LayoutStrategy::Simple).unwrap();
    let routed = simple.edges[1].routed().unwrap();
    assert_eq!(routed.id, "dangling");
    assert_eq!(routed.style["stroke"], json!("red"));
}

#[test]
fn numeric_and_empty_edge_ids() {
    let document = GraphDocument::from_json(
        r#"{
            "nodes": [{"id": 1}, {"id": 2}],
            "edges": [
                {"id": 7, "source": 1, "target": 2},
                {"id": "", "source": 2, "target": 1},
                {"id": 9, "source": 2, "target": 3}
            ]
        }"#,
    )
    .unwrap();
    let graph = document.graph;
    let mut config = Config::default();
    config.grid.unknown_edges = UnknownEdgePolicy::Skip;
    let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();

    let output = serde_json::to_value(&layout).unwrap();
    assert_eq!(output["edges"][0]["id"], json!("7"));
    assert_eq!(output["edges"][1]["id"], json!("edge-1"));
    assert_eq!(output["edges"][2]["id"], json!(9));
    assert_eq!(output["edges"][2].get("type"), None);
}

#[test]
fn fan_out_children_spread_around_parent() {
    let mut graph = Graph::new();
    for id in ["A", "B", "C", "D"] {
        graph.add_node(id);
    }
    for child in ["B", "C", "D"] {
        graph.add_edge("A", child);
    }
    let layout = compute_layout(&graph, &Config::default(), LayoutStrategy::Grid).unwrap();
    let a = cell_of(&layout, "A");
    let children: Vec<GridCell> = ["B", "C", "D"].iter().map(|id| cell_of(&layout, *id)).collect();
    let ys: HashSet<i64> = children.iter().map(|c| c.y).collect();
    assert_eq!(ys.len(), 3);
    for cell in &children {
        assert!((cell.y - a.y).abs() <= 1);
        assert_ne!(*cell, a);
        assert_eq!(cell.x, a.x + 1);
    }
}

#[test]
fn edgeless_graph_terminates_with_unique_cells() {
    let mut graph = Graph::new();
    for i in 0..25 {
        graph.add_node(format!("n{i}"));
    }
    for direction in [Direction::LeftRight, Direction::TopDown] {
        let mut config = Config::default();
        config.grid.direction = direction;
        let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();
        assert_unique_and_total(&graph, &layout);
        assert_eq!(layout.summary.roots.len(), 25);
        assert_eq!(layout.summary.leaves.len(), 25);
    }
}

#[test]
fn scrambled_graphs_never_overlap() {
    for (seed, nodes, edges) in [(1, 40, 60), (7, 120, 200), (42, 300, 250), (9, 60, 400)] {
        let graph = scrambled_graph(nodes, edges, seed);
        for direction in [Direction::LeftRight, Direction::TopDown] {
            let mut config = Config::default();
            config.grid.direction = direction;
            let layout = compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap();
            assert_unique_and_total(&graph, &layout);
            assert_eq!(layout.edges.len(), edges);
        }
    }
}

#[test]
fn layout_is_deterministic() {
    let graph = scrambled_graph(150, 220, 3);
    let config = Config::default();
    let first = serde_json::to_string(&compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap())
        .unwrap();
    let second =
        serde_json::to_string(&compute_layout(&graph, &config, LayoutStrategy::Grid).unwrap())
            .unwrap();
    assert_eq!(first, second);
}

#[test]
fn simple_grid_tiles_by_input_order() {
    let mut graph = Graph::new();
    for i in 0..10 {
        graph.add_node(format!("n{i}"));
    }
    graph.add_edge("n9", "n0");
    let mut config = Config::default();
    config.simple.columns = Some(3);
    let layout = compute_layout(&graph, &config, LayoutStrategy::Simple).unwrap();
    let rows: Vec<i64> = layout.nodes.iter().map(|n| n.cell.y).collect();
    let cols: Vec<i64> = layout.nodes.iter().map(|n| n.cell.x).collect();
    assert_eq!(rows, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3]);
    assert_eq!(cols, vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(layout.nodes[9].position.y, 450.0);
    assert_eq!(layout.edges[0].routed().unwrap().id, "edge-0");
}

#[test]
fn caller_inputs_are_not_mutated() {
    let mut graph = Graph::new();
    graph.add_node("A");
    graph.add_node("B");
    graph
        .edges
        .push(Edge::new("A", "B").with_style(json!({"stroke": "red"}).as_object().cloned().unwrap()));
    let before = graph.clone();
    let layout = layout_graph_grid(&graph, &Config::default().grid, &EdgeStyleConfig::default()).unwrap();
    assert_eq!(graph, before);
    assert_eq!(layout.edges[0].routed().unwrap().style["stroke"], json!("red"));
}
