use crate::config::{LayoutOptions, load_config};
use crate::ir::{Direction, GraphDocument};
use crate::layout::{LayoutStrategy, compute_layout};
use crate::layout_dump::write_layout_dump;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "upgrade-grid",
    version,
    about = "Lay out an upgrade-tree graph on a grid"
)]
pub struct Args {
    /// Input graph JSON ({nodes, edges, options?}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout strategy
    #[arg(short = 's', long = "strategy", value_enum, default_value = "grid")]
    pub strategy: StrategyArg,

    /// Layout direction (grid strategy)
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Column count (simple strategy)
    #[arg(long = "columns")]
    pub columns: Option<usize>,

    /// Pixel distance between grid cells
    #[arg(long = "gridSize")]
    pub grid_size: Option<f32>,

    /// Also write a debug dump of grid cells and topology
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StrategyArg {
    Grid,
    Simple,
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Grid => LayoutStrategy::Grid,
            StrategyArg::Simple => LayoutStrategy::Simple,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    #[value(name = "LR", alias = "lr")]
    Lr,
    #[value(name = "TB", aliases = ["tb", "TD", "td"])]
    Tb,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Lr => Direction::LeftRight,
            DirectionArg::Tb => Direction::TopDown,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())
        .context("failed to load config file")?;

    let input = read_input(args.input.as_deref())?;
    let document = GraphDocument::from_json(&input).context("invalid graph document")?;
    if let Some(options) = &document.options {
        config.apply_options(options);
    }
    config.apply_options(&cli_options(&args));

    let strategy = LayoutStrategy::from(args.strategy);
    tracing::debug!(
        ?strategy,
        nodes = document.graph.nodes.len(),
        edges = document.graph.edges.len(),
        "computing layout"
    );
    let layout = compute_layout(&document.graph, &config, strategy)?;

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    let json = serde_json::to_string_pretty(&layout)?;
    write_output(&json, args.output.as_deref())
}

fn cli_options(args: &Args) -> LayoutOptions {
    LayoutOptions {
        grid_size: args.grid_size,
        direction: args.direction.map(Direction::from),
        columns: args.columns,
        ..LayoutOptions::default()
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, json)?;
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
