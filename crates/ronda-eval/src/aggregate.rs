//! Cross-strategy aggregation.

use std::collections::BTreeMap;

use polars::prelude::*;
use rayon::prelude::*;
use ronda_store::TableStore;
use ronda_traits::{Date, Result, Symbol};
use serde::{Deserialize, Serialize};

use crate::{Evaluator, EvaluatorConfig, RankedResult, StrategySpec};

/// Configuration for [`run_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Keep only each strategy's best `n` symbols before aggregating
    pub top_n: Option<usize>,
    /// Drop aggregated symbols selected by fewer strategies than this (default: 1)
    pub min_appearances: usize,
    /// Evaluate strategies on the rayon pool instead of one after another
    pub parallel: bool,
    /// Per-strategy evaluation settings
    pub evaluator: EvaluatorConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            top_n: None,
            min_appearances: 1,
            parallel: true,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

/// One symbol's standing across a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateEntry {
    /// Symbol
    pub symbol: Symbol,
    /// Number of strategies that selected the symbol
    pub appearance_count: usize,
    /// Mean score over the strategies that selected it
    pub average_score: f64,
    /// Names of those strategies, in batch order
    pub strategies: Vec<String>,
}

/// Result of a batch run.
///
/// `entries` are ordered by appearance count descending, then average score
/// descending, then symbol ascending. `results` keeps every strategy's own
/// result in batch order, failed ones included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// As-of date requested for the batch; `None` means each strategy used its latest
    pub as_of: Option<Date>,
    /// Aggregated symbols
    pub entries: Vec<AggregateEntry>,
    /// Per-strategy results
    pub results: Vec<RankedResult>,
}

impl AggregateReport {
    /// Entry for `symbol`, if any strategy selected it.
    pub fn entry(&self, symbol: &str) -> Option<&AggregateEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Number of failed strategies.
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    /// Convert to a DataFrame with `symbol`, `appearance_count`,
    /// `average_score` and `strategies` (comma separated) columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let symbols: Vec<&str> = self.entries.iter().map(|e| e.symbol.as_str()).collect();
        let counts: Vec<u32> = self
            .entries
            .iter()
            .map(|e| e.appearance_count as u32)
            .collect();
        let averages: Vec<f64> = self.entries.iter().map(|e| e.average_score).collect();
        let strategies: Vec<String> = self.entries.iter().map(|e| e.strategies.join(",")).collect();
        let df = df! {
            "symbol" => symbols,
            "appearance_count" => counts,
            "average_score" => averages,
            "strategies" => strategies,
        }?;
        Ok(df)
    }
}

/// Evaluate `specs` against one snapshot and fold their candidates.
///
/// Strategies only read the store, so with `config.parallel` they run on
/// the rayon pool; the fold happens after every worker has finished. A
/// failed strategy contributes an empty candidate set.
pub fn run_batch(
    store: &TableStore,
    specs: &[StrategySpec],
    as_of: Option<Date>,
    config: &BatchConfig,
) -> AggregateReport {
    let evaluator = Evaluator::new(config.evaluator);
    let evaluate = |spec: &StrategySpec| {
        let mut result = evaluator.evaluate(store, spec, as_of);
        if let Some(n) = config.top_n {
            result.truncate(n);
        }
        result
    };
    let results: Vec<RankedResult> = if config.parallel {
        specs.par_iter().map(evaluate).collect()
    } else {
        specs.iter().map(evaluate).collect()
    };

    let mut entries = fold(&results);
    entries.retain(|e| e.appearance_count >= config.min_appearances);
    tracing::info!(
        strategies = results.len(),
        failed = results.iter().filter(|r| r.is_failed()).count(),
        symbols = entries.len(),
        "batch complete"
    );
    AggregateReport {
        as_of,
        entries,
        results,
    }
}

#[derive(Default)]
struct Tally<'a> {
    score_sum: f64,
    strategies: Vec<&'a str>,
}

fn fold(results: &[RankedResult]) -> Vec<AggregateEntry> {
    let mut tallies: BTreeMap<&str, Tally<'_>> = BTreeMap::new();
    for result in results {
        for entry in &result.entries {
            let tally = tallies.entry(entry.symbol.as_str()).or_default();
            tally.score_sum += entry.score;
            tally.strategies.push(result.strategy.as_str());
        }
    }

    let mut entries: Vec<AggregateEntry> = tallies
        .into_iter()
        .map(|(symbol, tally)| {
            let count = tally.strategies.len();
            AggregateEntry {
                symbol: symbol.to_string(),
                appearance_count: count,
                average_score: tally.score_sum / count as f64,
                strategies: tally.strategies.into_iter().map(str::to_string).collect(),
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        b.appearance_count
            .cmp(&a.appearance_count)
            .then_with(|| b.average_score.total_cmp(&a.average_score))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    entries
}
