use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use contraction_priority::{
    ch::{contraction_params::ContractionParams, contractor::contract_with_edge_difference},
    graphs::graph_factory::GraphFactory,
    restrictions::NoRestrictions,
};
use log::info;

/// Orders the vertices of a graph by edge difference and writes the resulting
/// contraction hierarchy.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Infile in .fmi or .gr format
    #[arg(short, long)]
    graph: PathBuf,
    /// Outfile in .json or .bincode format
    #[arg(short, long)]
    contracted_graph: PathBuf,
    /// Contraction parameters as JSON, missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    difference_factor: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    depth_factor: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    contracted_factor: Option<i32>,
    /// Hop limit of the witness search
    #[arg(long)]
    max_hops: Option<u32>,
    /// Settled vertex limit of the witness search
    #[arg(long)]
    max_settled: Option<usize>,
    /// Seed of the initial queue order
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn params(&self) -> Result<ContractionParams> {
        let mut params = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("unable to open config {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => ContractionParams::default(),
        };

        if let Some(factor) = self.difference_factor {
            params.priority_params.difference_factor = factor;
        }
        if let Some(factor) = self.depth_factor {
            params.priority_params.depth_factor = factor;
        }
        if let Some(factor) = self.contracted_factor {
            params.priority_params.contracted_factor = factor;
        }
        if let Some(max_hops) = self.max_hops {
            params.witness_params.max_hops = max_hops;
        }
        if let Some(max_settled) = self.max_settled {
            params.witness_params = params.witness_params.max_settled(max_settled);
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }

        Ok(params)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let params = args.params()?;

    info!("Loading graph");
    let start = Instant::now();
    let graph = GraphFactory::from_file(&args.graph)
        .with_context(|| format!("unable to read graph {}", args.graph.display()))?;
    info!(
        "it took {:?} to load a graph with {} vertices and {} half-edges",
        start.elapsed(),
        graph.number_of_vertices(),
        graph.number_of_edges()
    );

    info!("Starting contracted graph generation");
    let start = Instant::now();
    let contracted_graph = contract_with_edge_difference(graph, NoRestrictions, &params)?;
    info!(
        "Generating contracted graph took {:?}, {} shortcuts",
        start.elapsed(),
        contracted_graph.number_of_shortcuts()
    );

    info!("Writing contracted graph to file");
    let writer = BufWriter::new(
        File::create(&args.contracted_graph)
            .with_context(|| format!("unable to create {}", args.contracted_graph.display()))?,
    );
    match args
        .contracted_graph
        .extension()
        .and_then(|extension| extension.to_str())
    {
        Some("bincode") => bincode::serialize_into(writer, &contracted_graph)?,
        _ => serde_json::to_writer(writer, &contracted_graph)?,
    }

    Ok(())
}
