//! Screen command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ronda_data::load_snapshot;
use ronda_eval::{AggregateReport, Status, run_batch};
use ronda_store::TableKey;
use ronda_strategies::{available_strategies, build_strategy};

use super::banner;
use crate::data::{self, Source};

/// Rows printed in the text report.
const TEXT_ROWS: usize = 30;

/// Parsed arguments of `ronda screen`.
#[derive(Debug)]
pub(crate) struct ScreenArgs {
    pub(crate) strategies: Vec<String>,
    pub(crate) as_of: Option<String>,
    pub(crate) top: Option<usize>,
    pub(crate) min_appearances: Option<usize>,
    pub(crate) json: bool,
    pub(crate) source: Source,
    pub(crate) config: Option<PathBuf>,
    pub(crate) sequential: bool,
}

/// Load a snapshot, run the selected strategies and print the report.
pub(crate) async fn run_screen(args: ScreenArgs) -> Result<()> {
    let config = data::load_config(args.config.as_deref())?;
    let as_of = args.as_of.as_deref().map(data::parse_date).transpose()?;

    let names: Vec<String> = if args.strategies.is_empty() {
        available_strategies()
            .iter()
            .map(|info| info.name.to_string())
            .collect()
    } else {
        args.strategies
    };
    let specs = names
        .iter()
        .map(|name| build_strategy(name, &config.screen))
        .collect::<Result<Vec<_>, _>>()
        .context("run `ronda strategies` for the available names")?;

    let mut keys: Vec<TableKey> = specs
        .iter()
        .flat_map(|spec| spec.required().iter().copied())
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let provider = args.source.provider()?;
    tracing::info!(
        provider = provider.name(),
        strategies = specs.len(),
        tables = keys.len(),
        "loading snapshot"
    );
    let snapshot = load_snapshot(provider.as_ref(), &keys, &config.snapshot).await;
    if !snapshot.is_complete() {
        let skipped: Vec<&str> = snapshot.skipped.iter().map(|key| key.name()).collect();
        tracing::warn!(skipped = %skipped.join(", "), "snapshot is incomplete");
    }

    let mut batch = config.batch;
    if args.top.is_some() {
        batch.top_n = args.top;
    }
    if let Some(n) = args.min_appearances {
        batch.min_appearances = n;
    }
    if args.sequential {
        batch.parallel = false;
    }

    let report = run_batch(&snapshot.store, &specs, as_of, &batch);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AggregateReport) {
    banner("Screening Results");

    match report.as_of {
        Some(date) => println!("As of:      {date}"),
        None => println!("As of:      latest per strategy"),
    }
    println!(
        "Strategies: {} run, {} failed",
        report.results.len(),
        report.failed_count()
    );
    println!();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("STRATEGIES");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!(
        "{:<20} {:>10} {:>12}  {}",
        "Strategy", "Candidates", "As of", "Top picks"
    );
    println!("{}", "─".repeat(72));
    for result in &report.results {
        match &result.status {
            Status::Done => {
                let as_of = result.as_of.map_or_else(|| "-".to_string(), |d| d.to_string());
                let top: Vec<&str> = result.symbols().into_iter().take(5).collect();
                println!(
                    "{:<20} {:>10} {:>12}  {}",
                    result.strategy,
                    result.len(),
                    as_of,
                    top.join(" ")
                );
            }
            Status::Failed { stage, reason } => {
                println!(
                    "{:<20} {:>10} {:>12}  failed at {stage}: {reason}",
                    result.strategy, "-", "-"
                );
            }
        }
    }
    println!();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("AGGREGATE");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if report.entries.is_empty() {
        println!("No symbol passed enough strategies.\n");
        return;
    }

    println!(
        "{:>4}  {:<10} {:>6} {:>10}  {}",
        "Rank", "Symbol", "Count", "Avg score", "Strategies"
    );
    println!("{}", "─".repeat(60));
    for (i, entry) in report.entries.iter().take(TEXT_ROWS).enumerate() {
        println!(
            "{:>4}  {:<10} {:>6} {:>10.4}  {}",
            i + 1,
            entry.symbol,
            entry.appearance_count,
            entry.average_score,
            entry.strategies.join(", ")
        );
    }
    if report.entries.len() > TEXT_ROWS {
        println!(
            "\n... {} more, use --format json for the full list",
            report.entries.len() - TEXT_ROWS
        );
    }
    println!();
}
