use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use kg_neighbourhood::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kg-neighbourhood")]
#[command(about = "Sample bounded neighbourhoods from a knowledge graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sampled neighbourhood trees as JSON
    Sample(SampleArgs),
    /// Encode the sampled trees into per-depth Arrow batches and print their sizes
    Encode(SampleArgs),
    /// Write a synthetic family graph as a JSON graph document
    Generate {
        #[arg(short, long)]
        people: usize,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct SampleArgs {
    /// JSON graph document to load
    #[arg(short, long, conflicts_with = "synthetic")]
    graph: Option<PathBuf>,
    /// Use a synthetic family graph of this many people
    #[arg(long)]
    synthetic: Option<usize>,
    /// Concept ids to start from
    #[arg(short, long, required = true)]
    start: Vec<String>,
    /// JSON traversal config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Sample size per depth, overriding the config
    #[arg(long, value_delimiter = ',')]
    sample_sizes: Option<Vec<usize>>,
    /// Sample randomly with this seed instead of in order
    #[arg(long)]
    seed: Option<u64>,
}

async fn load_graph(args: &SampleArgs) -> anyhow::Result<KnowledgeGraph> {
    match (&args.graph, args.synthetic) {
        (Some(path), _) => KnowledgeGraph::from_json_file(path)
            .await
            .with_context(|| format!("loading graph {}", path.display())),
        (None, Some(people)) => Ok(synthetic::family_graph(people)?),
        (None, None) => bail!("either --graph or --synthetic is required"),
    }
}

async fn load_config(args: &SampleArgs) -> anyhow::Result<TraversalConfig> {
    let mut config = match &args.config {
        Some(path) => TraversalConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TraversalConfig::default(),
    };

    if let Some(sample_sizes) = &args.sample_sizes {
        config.sample_sizes = sample_sizes.clone();
    }
    if let Some(seed) = args.seed {
        config.strategy = SamplingStrategy::Random { seed };
    }

    config.validate()?;
    Ok(config)
}

async fn collect(args: &SampleArgs) -> anyhow::Result<Vec<NeighbourhoodTree>> {
    let graph = load_graph(args).await?;
    let config = load_config(args).await?;

    log::info!(
        "Loaded graph with {} concepts and {} role players",
        graph.concept_count(),
        graph.role_player_count()
    );

    let starts = args
        .start
        .iter()
        .map(|id| {
            graph
                .concept(id)
                .cloned()
                .with_context(|| format!("start concept {} is not in the graph", id))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let traverser = NeighbourhoodTraverser::new(GraphExecutor::new(&graph), config.build_samplers()?);
    Ok(traverser.collect_many(&starts)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample(args) => {
            let trees = collect(&args).await?;
            println!("{}", serde_json::to_string_pretty(&trees)?);
        }
        Commands::Encode(args) => {
            let trees = collect(&args).await?;
            let encoders = TreeEncoders::from_trees(&trees);
            let batches = encode_trees(&trees, &encoders)?;

            println!(
                "{} concept types, {} role types",
                encoders.concept_types.len(),
                encoders.role_types.len()
            );
            for (depth, batch) in batches.iter().enumerate() {
                println!("depth {}: {} rows", depth, batch.num_rows());
            }
        }
        Commands::Generate { people, output } => {
            let graph = synthetic::family_graph(people)?;
            tokio::fs::write(&output, graph.to_json_string()?)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Wrote {} concepts and {} role players to {}",
                graph.concept_count(),
                graph.role_player_count(),
                output.display()
            );
        }
    }

    Ok(())
}
