//! kgraph CLI - query a knowledge graph snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Two-hop neighborhood of a node, by id or by name
//! kgraph --snapshot graph.json neighborhood "Ada Lovelace" --hops 2
//!
//! # Shortest path between two nodes
//! kgraph --snapshot graph.json path "Ada Lovelace" "Analytical Engine"
//!
//! # Hybrid search with explicit weights
//! kgraph --snapshot graph.json search "difference engine" --lexical-weight 0.7
//!
//! # Adaptive hybrid search as JSON
//! kgraph --snapshot graph.json --format json adaptive-search "engine"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kgraph_cli::{commands, output, GraphSnapshot, KnowledgeGraphService, OutputFormat};
use kgraph_core::KgConfig;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "kgraph")]
#[command(about = "kgraph - graph traversal and hybrid retrieval over a knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Graph snapshot (JSON) to serve queries from
    #[arg(short, long, global = true, env = "KGRAPH_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, global = true, default_value = "human")]
    format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Nodes and edges within a number of hops of a node
    Neighborhood {
        /// Node id or name
        node: String,

        /// Number of hops (default from configuration)
        #[arg(long)]
        hops: Option<usize>,

        /// Annotate nodes with degree centrality
        #[arg(long)]
        centrality: bool,
    },

    /// Shortest path between two nodes
    Path {
        /// Start node id or name
        from: String,

        /// Target node id or name
        to: String,

        /// Maximum path length
        #[arg(long)]
        max_hops: Option<usize>,
    },

    /// Connected component containing a node
    Component {
        /// Node id or name
        node: String,
    },

    /// Degree centrality within a set of nodes
    Centrality {
        /// Node ids or names
        #[arg(required = true)]
        nodes: Vec<String>,
    },

    /// Subgraph induced by a set of nodes
    Subgraph {
        /// Node ids or names
        #[arg(required = true)]
        nodes: Vec<String>,
    },

    /// Whole-graph statistics
    Stats,

    /// Hybrid lexical and vector search
    Search {
        /// Search query
        query: String,

        /// Lexical weight (the vector weight defaults to its complement)
        #[arg(long)]
        lexical_weight: Option<f64>,

        /// Vector weight
        #[arg(long)]
        vector_weight: Option<f64>,

        /// Zero-based page number
        #[arg(short, long)]
        page: Option<usize>,

        /// Page size
        #[arg(short = 'n', long)]
        size: Option<usize>,
    },

    /// Hybrid search with weights chosen from result quality
    AdaptiveSearch {
        /// Search query
        query: String,

        /// Zero-based page number
        #[arg(short, long)]
        page: Option<usize>,

        /// Page size
        #[arg(short = 'n', long)]
        size: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::error(format!("{:#}", e));
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = KgConfig::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(cli.verbose, &config.general.log_level);

    let format: OutputFormat = cli.format.into();
    let snapshot_path = cli
        .snapshot
        .context("No snapshot given; pass --snapshot or set KGRAPH_SNAPSHOT")?;
    let snapshot = GraphSnapshot::load(&snapshot_path)
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;
    let service = KnowledgeGraphService::from_snapshot(snapshot, config)?;

    match cli.command {
        Commands::Neighborhood { node, hops, centrality } => {
            commands::neighborhood(&service, &node, hops, centrality, format).await?;
        }
        Commands::Path { from, to, max_hops } => {
            commands::path(&service, &from, &to, max_hops, format).await?;
        }
        Commands::Component { node } => {
            commands::component(&service, &node, format).await?;
        }
        Commands::Centrality { nodes } => {
            commands::centrality(&service, &nodes, format).await?;
        }
        Commands::Subgraph { nodes } => {
            commands::subgraph(&service, &nodes, format).await?;
        }
        Commands::Stats => {
            commands::stats(&service, format).await?;
        }
        Commands::Search {
            query,
            lexical_weight,
            vector_weight,
            page,
            size,
        } => {
            commands::search(&service, &query, lexical_weight, vector_weight, page, size, format).await?;
        }
        Commands::AdaptiveSearch { query, page, size } => {
            commands::adaptive_search(&service, &query, page, size, format).await?;
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("kgraph_core=debug,kgraph_traversal=debug,kgraph_search=debug,kgraph_cli=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
