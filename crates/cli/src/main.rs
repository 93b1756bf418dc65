use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pixseek_embedder::{ByteHistogramEmbedder, ImageEmbedder};
use pixseek_indexer::DatasetIndexer;
use pixseek_vector_store::IndexService;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pixseek")]
#[command(about = "Visual similarity search over image datasets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a search index from a directory of images
    Build(BuildArgs),

    /// Find images similar to a query image
    Search(SearchArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Directory containing the image dataset
    #[arg(long)]
    dataset: PathBuf,

    /// Output path for the index artifact
    #[arg(long)]
    output: PathBuf,

    /// Print build stats as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Path to the index artifact
    #[arg(long)]
    index: PathBuf,

    /// Query image
    #[arg(long)]
    image: PathBuf,

    /// Number of results to return
    #[arg(short = 'k', long = "top-k", default_value_t = 10)]
    top_k: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // One embedder instance per process, injected into everything below.
    let embedder: Arc<dyn ImageEmbedder> = Arc::new(ByteHistogramEmbedder);

    match cli.command {
        Commands::Build(args) => run_build(args, embedder).await,
        Commands::Search(args) => run_search(args, embedder).await,
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run_build(args: BuildArgs, embedder: Arc<dyn ImageEmbedder>) -> Result<()> {
    let indexer = DatasetIndexer::new(embedder);
    let stats = indexer
        .build_from_dataset(&args.dataset, &args.output)
        .await
        .with_context(|| format!("failed to build index from {}", args.dataset.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Indexed {} images ({} skipped) in {} ms",
            stats.indexed, stats.skipped, stats.time_ms
        );
    }
    Ok(())
}

async fn run_search(args: SearchArgs, embedder: Arc<dyn ImageEmbedder>) -> Result<()> {
    let service = IndexService::new(&args.index);

    let query = embedder
        .extract(&args.image)
        .await
        .with_context(|| format!("failed to embed query image {}", args.image.display()))?;
    log::debug!("Query embedding dimension: {}", query.len());
    let hits = service.search(&query, args.top_k).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else if hits.is_empty() {
        println!("No matches");
    } else {
        for hit in &hits {
            println!("{:.6}  {}", hit.distance, hit.identifier);
        }
    }
    Ok(())
}
