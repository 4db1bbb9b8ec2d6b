use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shopmatch::io::read_catalog;
use shopmatch::{Catalog, Error, LoadMode, ScoreWeights, SearchEngine, SearchOptions};

/// Free-text product matching over a product catalog
#[derive(Parser, Debug)]
#[command(name = "shopmatch")]
#[command(about = "Find the catalog products that best match a free-text query", long_about = None)]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a catalog and print the ranked results as JSON
    Search {
        /// Path to the catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Score weights as JSON, e.g. '{"keyword":0.4,"category":0.25,"constraints":0.2,"quality":0.15}'
        #[arg(long)]
        weights: Option<String>,

        /// Rank products that violate hard constraints instead of dropping them
        #[arg(long)]
        soft_constraints: bool,

        /// The query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Load a catalog and print the load report
    Validate {
        /// Path to the catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Fail if any record is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Print catalog statistics
    Stats {
        /// Path to the catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("unknown log level: {}", other),
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_engine(path: &Path) -> anyhow::Result<SearchEngine> {
    let records = read_catalog(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let engine = SearchEngine::new();
    let report = engine.load_catalog(records)?;
    if !report.rejected.is_empty() {
        warn!(
            rejected = report.rejected.len(),
            "Some catalog records were rejected; run `shopmatch validate` for details"
        );
    }
    info!(products = report.accepted, catalog = %path.display(), "Catalog loaded");
    Ok(engine)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Search {
            catalog,
            limit,
            weights,
            soft_constraints,
            query,
        } => {
            let options = SearchOptions {
                limit,
                require_all_hard_constraints: !soft_constraints,
                weights: weights.as_deref().map(ScoreWeights::from_json).transpose()?,
                ..Default::default()
            };

            let engine = load_engine(&catalog)?;
            let response = engine.search(&query.join(" "), &options)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Validate { catalog, strict } => {
            let records = read_catalog(&catalog)
                .with_context(|| format!("failed to read catalog {}", catalog.display()))?;
            let mode = if strict { LoadMode::Strict } else { LoadMode::Lenient };

            match Catalog::new().load_json(records, mode) {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(Error::StrictLoad {
                    count,
                    first,
                    rejected,
                }) => {
                    let report = json!({ "accepted": 0, "rejected": rejected });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    bail!("strict load rejected {} record(s), first: {}", count, first);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Stats { catalog } => {
            let engine = load_engine(&catalog)?;
            let stats = engine.catalog().all().stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
