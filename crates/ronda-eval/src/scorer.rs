//! Ranking scores for a strategy's candidates.

use std::fmt;

use ronda_store::TableKey;
use ronda_traits::{Date, Panel, Result, Symbol, Table, stats::standardize};

use crate::Inputs;

/// Builds a derived table from a strategy's inputs.
pub type TableFn = Box<dyn Fn(&Inputs<'_>) -> Result<Table> + Send + Sync>;

/// A per-symbol quantity read at the as-of date.
pub struct Metric {
    label: String,
    source: Source,
}

enum Source {
    Table(TableKey),
    Derived(TableFn),
}

impl Metric {
    /// A raw snapshot table.
    #[must_use]
    pub fn table(key: TableKey) -> Self {
        Self {
            label: key.name().to_string(),
            source: Source::Table(key),
        }
    }

    /// A table derived from the inputs, e.g. year-over-year revenue growth.
    pub fn derived<F>(label: impl Into<String>, build: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> Result<Table> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            source: Source::Derived(Box::new(build)),
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Value for each candidate at `as_of` under step-fill, `NaN` if undefined.
    ///
    /// # Errors
    ///
    /// Propagates errors from reading or deriving the table.
    pub fn values_at(&self, inputs: &Inputs<'_>, candidates: &[Symbol], as_of: Date) -> Result<Vec<f64>> {
        let read = |table: &Table| -> Vec<f64> {
            candidates
                .iter()
                .map(|s| table.value_as_of(s, as_of).unwrap_or(f64::NAN))
                .collect()
        };
        match &self.source {
            Source::Table(key) => Ok(read(inputs.table(*key)?)),
            Source::Derived(build) => Ok(read(&build(inputs)?)),
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric").field("label", &self.label).finish()
    }
}

/// Scores a strategy's candidate set.
///
/// Implementations must be deterministic: the same inputs, candidates and
/// date give the same scores. Scores are returned in candidate order.
pub trait Scorer: Send + Sync + fmt::Debug {
    /// Name for logging.
    fn name(&self) -> &str;

    /// One score per candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be read.
    fn score(&self, inputs: &Inputs<'_>, candidates: &[Symbol], as_of: Date) -> Result<Vec<f64>>;
}

/// Gives every candidate the same score; order then falls back to symbol.
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer {
    value: f64,
}

impl ConstantScorer {
    /// Create a constant scorer.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for ConstantScorer {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Scorer for ConstantScorer {
    fn name(&self) -> &str {
        "constant"
    }

    fn score(&self, _inputs: &Inputs<'_>, candidates: &[Symbol], _as_of: Date) -> Result<Vec<f64>> {
        Ok(vec![self.value; candidates.len()])
    }
}

/// Scores each candidate by the latest value of one metric.
#[derive(Debug)]
pub struct LatestValueScorer {
    metric: Metric,
}

impl LatestValueScorer {
    /// Create a scorer reading `metric`.
    #[must_use]
    pub const fn new(metric: Metric) -> Self {
        Self { metric }
    }
}

impl Scorer for LatestValueScorer {
    fn name(&self) -> &str {
        self.metric.label()
    }

    fn score(&self, inputs: &Inputs<'_>, candidates: &[Symbol], as_of: Date) -> Result<Vec<f64>> {
        self.metric.values_at(inputs, candidates, as_of)
    }
}

/// Weighted sum of cross-sectionally standardized metrics.
///
/// Each metric is turned into z-scores over the candidate set (mean 0,
/// sample std 1). A candidate whose value is undefined contributes zero. A
/// metric with no spread, such as one over a single candidate, gives every
/// candidate the fixed [`DEFAULT_DEGENERATE_SCORE`] instead.
///
/// # Example
///
/// ```rust,ignore
/// let scorer = WeightedZScore::new()
///     .term(0.6, Metric::derived("revenue yoy", yoy))
///     .term(0.4, Metric::derived("revenue mom", mom));
/// ```
#[derive(Debug)]
pub struct WeightedZScore {
    terms: Vec<(f64, Metric)>,
    degenerate: f64,
}

/// Per-metric score used when a metric has no spread over the candidates.
pub const DEFAULT_DEGENERATE_SCORE: f64 = 50.0;

impl Default for WeightedZScore {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            degenerate: DEFAULT_DEGENERATE_SCORE,
        }
    }
}

impl WeightedZScore {
    /// Create a scorer with no terms (scores everything zero).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Score given to every candidate for a metric with no spread.
    #[must_use]
    pub const fn degenerate_score(mut self, score: f64) -> Self {
        self.degenerate = score;
        self
    }

    /// Add a weighted term.
    #[must_use]
    pub fn term(mut self, weight: f64, metric: Metric) -> Self {
        self.terms.push((weight, metric));
        self
    }

    /// The configured terms.
    pub fn terms(&self) -> &[(f64, Metric)] {
        &self.terms
    }
}

impl Scorer for WeightedZScore {
    fn name(&self) -> &str {
        "weighted_zscore"
    }

    fn score(&self, inputs: &Inputs<'_>, candidates: &[Symbol], as_of: Date) -> Result<Vec<f64>> {
        let mut total = vec![0.0; candidates.len()];
        for (weight, metric) in &self.terms {
            let values = metric.values_at(inputs, candidates, as_of)?;
            let (mut z, result) = standardize(&values);
            if !result.applied {
                z.fill(self.degenerate);
            }
            tracing::trace!(
                metric = metric.label(),
                mean = result.mean,
                std = result.std,
                applied = result.applied,
                "standardized metric"
            );
            for (acc, z) in total.iter_mut().zip(z) {
                if z.is_finite() {
                    *acc += weight * z;
                }
            }
        }
        Ok(total)
    }
}
