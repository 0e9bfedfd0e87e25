//! Strategy evaluation and cross-strategy aggregation for ronda.
//!
//! A [`StrategySpec`] declares the tables it reads, a list of condition
//! builders and a [`Scorer`]. [`evaluate_strategy`] runs one spec against a
//! [`TableStore`](ronda_store::TableStore) and returns a [`RankedResult`];
//! [`run_batch`] runs many in parallel and folds their candidates into an
//! [`AggregateReport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ronda_eval::{BatchConfig, run_batch};
//!
//! let report = run_batch(&store, &specs, None, &BatchConfig::default());
//! for entry in report.entries.iter().take(10) {
//!     println!("{} {} {:.2}", entry.symbol, entry.appearance_count, entry.average_score);
//! }
//! ```

mod aggregate;
mod evaluate;
mod inputs;
mod result;
mod scorer;
mod strategy;

pub use aggregate::{AggregateEntry, AggregateReport, BatchConfig, run_batch};
pub use evaluate::{Evaluator, EvaluatorConfig, evaluate_strategy};
pub use inputs::Inputs;
pub use result::{EvalState, RankedResult, ScoredSymbol, Status};
pub use scorer::{
    ConstantScorer, DEFAULT_DEGENERATE_SCORE, LatestValueScorer, Metric, Scorer, TableFn,
    WeightedZScore,
};
pub use strategy::{ConditionFn, ConditionStep, StrategySpec};
