//! Per-strategy evaluation results.

use std::fmt;

use polars::prelude::*;
use ronda_traits::{Date, Result, Symbol};
use serde::Serialize;

/// Stage of a strategy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalState {
    /// Resolving declared tables.
    Loading,
    /// Building conditions.
    Computing,
    /// Combining conditions and reading the as-of row.
    Filtering,
    /// Scoring candidates.
    Scoring,
    /// Finished with a ranked result.
    Done,
    /// Stopped early; the result is empty.
    Failed,
}

impl EvalState {
    /// Lowercase name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Computing => "computing",
            Self::Filtering => "filtering",
            Self::Scoring => "scoring",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EvalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    /// Completed normally (possibly with zero candidates).
    Done,
    /// Stopped in `stage` because of `reason`.
    Failed {
        /// Stage that failed
        stage: EvalState,
        /// Error message
        reason: String,
    },
}

/// One ranked symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSymbol {
    /// Symbol
    pub symbol: Symbol,
    /// Ranking score, always finite
    pub score: f64,
}

/// The ranked candidates of one strategy at one as-of date.
///
/// Entries are sorted by score descending, ties by symbol ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// Strategy name
    pub strategy: String,
    /// Strategy version
    pub version: String,
    /// Date the decision was read at; `None` if no declared table had rows
    pub as_of: Option<Date>,
    /// Ranked candidates
    pub entries: Vec<ScoredSymbol>,
    /// How the evaluation ended
    #[serde(flatten)]
    pub status: Status,
}

impl RankedResult {
    /// An empty, failed result.
    #[must_use]
    pub fn failed(
        strategy: impl Into<String>,
        version: impl Into<String>,
        as_of: Option<Date>,
        stage: EvalState,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            version: version.into(),
            as_of,
            entries: Vec::new(),
            status: Status::Failed {
                stage,
                reason: reason.into(),
            },
        }
    }

    /// Whether the evaluation failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, Status::Failed { .. })
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate symbols in rank order.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    /// Score of `symbol`, if it is a candidate.
    pub fn score_of(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.score)
    }

    /// Keep only the `n` best entries.
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }

    /// Convert to a DataFrame with `rank`, `symbol` and `score` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let rank: Vec<u32> = (1..=self.entries.len() as u32).collect();
        let symbols: Vec<&str> = self.symbols();
        let scores: Vec<f64> = self.entries.iter().map(|e| e.score).collect();
        let df = df! {
            "rank" => rank,
            "symbol" => symbols,
            "score" => scores,
        }?;
        Ok(df)
    }
}

/// Sort entries by score descending, then symbol ascending.
pub(crate) fn rank(entries: &mut [ScoredSymbol]) {
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}
