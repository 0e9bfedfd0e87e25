//! ronda CLI binary.
//!
//! Provides a command-line interface for the ronda stock screener.

mod cmd;
mod data;

use std::{path::PathBuf, process};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Multi-frequency stock screener", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in strategies
    Strategies {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show descriptions and required tables
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the table registry
    Tables {
        /// Filter by dataset
        #[arg(short, long)]
        dataset: Option<String>,
    },

    /// Run strategies against a snapshot and rank the candidates
    Screen {
        /// Strategy names (defaults to all)
        #[arg(short, long, value_delimiter = ',')]
        strategies: Vec<String>,

        /// As-of date (YYYY-MM-DD, defaults to the latest available)
        #[arg(long)]
        as_of: Option<String>,

        /// Keep only the top N symbols of each strategy
        #[arg(short, long)]
        top: Option<usize>,

        /// Aggregate only symbols selected by at least N strategies
        #[arg(long)]
        min_appearances: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Snapshot directory of `<dataset>/<field>.json` payloads
        #[arg(long, conflicts_with = "remote", required_unless_present = "remote")]
        data_dir: Option<PathBuf>,

        /// Fetch the snapshot from RONDA_API_URL
        #[arg(long)]
        remote: bool,

        /// JSON config file with `screen`, `batch` and `snapshot` sections
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Evaluate strategies one after another
        #[arg(long)]
        sequential: bool,
    },
}

/// How `screen` prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable tables
    Text,
    /// The full report as JSON
    Json,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr so JSON output on stdout stays clean.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Strategies { category, verbose } => {
            cmd::strategies::list_strategies(category.as_deref(), verbose)?;
        }
        Commands::Tables { dataset } => {
            cmd::tables::list_tables(dataset.as_deref());
        }
        Commands::Screen {
            strategies,
            as_of,
            top,
            min_appearances,
            format,
            data_dir,
            remote,
            config,
            sequential,
        } => {
            let args = cmd::screen::ScreenArgs {
                strategies,
                as_of,
                top,
                min_appearances,
                json: format == OutputFormat::Json,
                source: data::Source::from_flags(data_dir, remote)?,
                config,
                sequential,
            };
            cmd::screen::run_screen(args).await?;
        }
    }

    Ok(())
}
