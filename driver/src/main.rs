use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use fusegraph::graph::load::read_edge_list;
use fusegraph::{EngineConfig, JobSpec, WeightKind};
use tracing::info;

mod report;
mod strategy;

use report::RunReport;
use strategy::Strategy;

#[derive(Parser)]
#[command(name = "fusegraph")]
#[command(about = "Run graph jobs over a binary edge list", long_about = None)]
struct Cli {
    /// Binary edge list: little-endian `u32 src, u32 dst[, f32 weight]` records
    #[arg(long)]
    graph: PathBuf,

    /// Number of vertices in the graph
    #[arg(long)]
    vertices: usize,

    /// Records carry an `f32` weight
    #[arg(long, default_value_t = false)]
    weighted: bool,

    /// Add the reverse of every edge
    #[arg(long, default_value_t = false)]
    undirected: bool,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// How the jobs share the graph and the workers
    #[arg(long, value_enum, default_value_t = Strategy::Fused)]
    strategy: Strategy,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Jobs: `bfs:ROOT`, `sssp:ROOT`, `cc`, `pagerank[:ITERATIONS[:DAMPING]]`
    #[arg(required = true)]
    jobs: Vec<JobSpec>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("parsing configuration {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let kind = if cli.weighted {
        WeightKind::Numeric
    } else {
        WeightKind::Unit
    };
    let start = Instant::now();
    let mut graph = read_edge_list(&cli.graph, cli.vertices, kind)
        .with_context(|| format!("loading graph {}", cli.graph.display()))?;
    if cli.undirected {
        graph = graph.symmetrized();
    }
    let graph = Arc::new(graph);
    info!(
        vertices = graph.vertices(),
        edges = graph.edges(),
        elapsed = ?start.elapsed(),
        "graph loaded"
    );

    let start = Instant::now();
    let outcome = cli.strategy.run(&graph, config, &cli.jobs)?;
    let report = RunReport::new(cli.strategy, &graph, outcome, start.elapsed());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
