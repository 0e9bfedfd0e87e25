//! Single-strategy evaluation.

use ronda_store::TableStore;
use ronda_traits::{Condition, Date, Result, RondaError};
use serde::{Deserialize, Serialize};

use crate::{
    Inputs, StrategySpec,
    result::{EvalState, RankedResult, ScoredSymbol, Status, rank},
};

/// Configuration for [`Evaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Log how many symbols pass each condition at the as-of date
    pub log_condition_counts: bool,
    /// Score given to a candidate whose computed score is not finite
    pub fallback_score: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            log_condition_counts: true,
            fallback_score: 0.0,
        }
    }
}

/// Runs one strategy against one snapshot.
///
/// Evaluation moves through `Loading`, `Computing`, `Filtering` and
/// `Scoring`. Any stage error ends in an empty result with
/// [`Status::Failed`]; it is logged and never panics, so a batch of
/// strategies can keep going.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create an evaluator.
    #[must_use]
    pub const fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `spec` at `as_of`, or at the latest timestamp across its
    /// declared tables when `as_of` is `None`.
    pub fn evaluate(&self, store: &TableStore, spec: &StrategySpec, as_of: Option<Date>) -> RankedResult {
        let fail = |as_of, stage: EvalState, err: RondaError| {
            tracing::warn!(strategy = spec.name(), %stage, error = %err, "strategy failed");
            RankedResult::failed(spec.name(), spec.version(), as_of, stage, err.to_string())
        };

        // Loading
        let missing: Vec<&str> = spec
            .required()
            .iter()
            .filter(|key| !store.has_key(**key))
            .map(|key| key.name())
            .collect();
        if !missing.is_empty() {
            let err = RondaError::NotFound(missing.join(", "));
            return fail(as_of, EvalState::Loading, err);
        }
        let as_of = as_of.or_else(|| store.latest_date(spec.required().iter().map(|k| k.name())));
        let inputs = Inputs::new(store, spec.required());

        // Computing
        let conditions = match build_conditions(spec, &inputs) {
            Ok(conditions) => conditions,
            Err(err) => return fail(as_of, EvalState::Computing, err),
        };

        // Filtering
        let combined = match ronda_align::all(&conditions.iter().collect::<Vec<_>>()) {
            Ok(combined) => combined,
            Err(err) => return fail(as_of, EvalState::Filtering, err),
        };
        let Some(as_of) = as_of else {
            tracing::debug!(strategy = spec.name(), "no rows in declared tables");
            return self.done(spec, None, Vec::new());
        };
        if self.config.log_condition_counts {
            for condition in &conditions {
                tracing::debug!(
                    strategy = spec.name(),
                    condition = condition.label(),
                    passed = condition.count_as_of(as_of),
                    "condition"
                );
            }
        }
        let candidates = combined.candidates_as_of(as_of);
        if candidates.is_empty() {
            return self.done(spec, Some(as_of), Vec::new());
        }

        // Scoring
        let scores = match spec.scorer().score(&inputs, &candidates, as_of) {
            Ok(scores) if scores.len() == candidates.len() => scores,
            Ok(scores) => {
                let err = RondaError::Shape(format!(
                    "scorer {} returned {} scores for {} candidates",
                    spec.scorer().name(),
                    scores.len(),
                    candidates.len()
                ));
                return fail(Some(as_of), EvalState::Scoring, err);
            }
            Err(err) => return fail(Some(as_of), EvalState::Scoring, err),
        };
        let entries = candidates
            .into_iter()
            .zip(scores)
            .map(|(symbol, score)| ScoredSymbol {
                symbol,
                score: if score.is_finite() {
                    score
                } else {
                    self.config.fallback_score
                },
            })
            .collect();
        self.done(spec, Some(as_of), entries)
    }

    fn done(&self, spec: &StrategySpec, as_of: Option<Date>, mut entries: Vec<ScoredSymbol>) -> RankedResult {
        rank(&mut entries);
        tracing::debug!(
            strategy = spec.name(),
            candidates = entries.len(),
            as_of = ?as_of,
            "strategy done"
        );
        RankedResult {
            strategy: spec.name().to_string(),
            version: spec.version().to_string(),
            as_of,
            entries,
            status: Status::Done,
        }
    }
}

fn build_conditions(spec: &StrategySpec, inputs: &Inputs<'_>) -> Result<Vec<Condition>> {
    if spec.steps().is_empty() {
        return Err(RondaError::InvalidData(format!(
            "strategy {} has no conditions",
            spec.name()
        )));
    }
    spec.steps().iter().map(|step| step.build(inputs)).collect()
}

/// Evaluate one strategy with the default [`EvaluatorConfig`].
///
/// # Example
///
/// ```
/// use ronda_align::CompareOp;
/// use ronda_eval::{StrategySpec, evaluate_strategy};
/// use ronda_predicates::threshold;
/// use ronda_store::{TableKey, TableStore};
/// use ronda_traits::{Date, Frequency, Table};
///
/// let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
/// let close = Table::from_columns(
///     Frequency::Daily,
///     "TWD",
///     vec![d(2), d(3)],
///     vec![("A".to_string(), vec![100.0, 120.0]), ("B".to_string(), vec![90.0, 95.0])],
/// )
/// .unwrap();
/// let mut store = TableStore::new();
/// store.register(TableKey::Close.name(), close).unwrap();
///
/// let spec = StrategySpec::new("breakout", "1")
///     .require([TableKey::Close])
///     .condition("close > 105", |inputs| {
///         threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, 105.0)
///     });
///
/// let result = evaluate_strategy(&store, &spec, None);
/// assert_eq!(result.symbols(), vec!["A"]);
/// assert_eq!(result.as_of, Some(d(3)));
/// ```
pub fn evaluate_strategy(store: &TableStore, spec: &StrategySpec, as_of: Option<Date>) -> RankedResult {
    Evaluator::default().evaluate(store, spec, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantScorer, LatestValueScorer, Metric, Scorer};
    use approx::assert_relative_eq;
    use ronda_align::CompareOp;
    use ronda_predicates::threshold;
    use ronda_store::TableKey;
    use ronda_traits::{Frequency, Symbol, Table};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn store() -> TableStore {
        let close = Table::from_columns(
            Frequency::Daily,
            "TWD",
            vec![d(2), d(3), d(4)],
            vec![
                ("A".into(), vec![100.0, 110.0, 120.0]),
                ("B".into(), vec![200.0, 90.0, 130.0]),
                ("C".into(), vec![50.0, 60.0, f64::NAN]),
            ],
        )
        .unwrap();
        let mut store = TableStore::new();
        store.register(TableKey::Close.name(), close).unwrap();
        store
    }

    fn above(level: f64) -> StrategySpec {
        StrategySpec::new("above", "1")
            .require([TableKey::Close])
            .condition(format!("close > {level}"), move |inputs| {
                threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, level)
            })
            .score_with(LatestValueScorer::new(Metric::table(TableKey::Close)))
    }

    #[test]
    fn test_default_as_of_is_latest_row() {
        let result = evaluate_strategy(&store(), &above(105.0), None);
        assert_eq!(result.status, Status::Done);
        assert_eq!(result.as_of, Some(d(4)));
        assert_eq!(result.symbols(), vec!["B", "A"]);
        assert_relative_eq!(result.entries[0].score, 130.0);
    }

    #[test]
    fn test_explicit_as_of() {
        let result = evaluate_strategy(&store(), &above(105.0), Some(d(3)));
        assert_eq!(result.symbols(), vec!["A"]);
    }

    #[test]
    fn test_as_of_before_first_row_is_empty() {
        let result = evaluate_strategy(&store(), &above(0.0), Some(d(1)));
        assert!(!result.is_failed());
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_table_fails_at_loading() {
        let spec = above(105.0).require([TableKey::Volume]);
        let result = evaluate_strategy(&store(), &spec, None);
        assert!(result.is_empty());
        match result.status {
            Status::Failed { stage, reason } => {
                assert_eq!(stage, EvalState::Loading);
                assert!(reason.contains("price:volume"));
            }
            Status::Done => panic!("expected failure"),
        }
    }

    #[test]
    fn test_undeclared_read_fails_at_computing() {
        let spec = StrategySpec::new("sneaky", "1").condition("reads close", |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, 0.0)
        });
        let result = evaluate_strategy(&store(), &spec, None);
        assert!(matches!(
            result.status,
            Status::Failed {
                stage: EvalState::Computing,
                ..
            }
        ));
    }

    #[test]
    fn test_no_conditions_fails() {
        let spec = StrategySpec::new("empty", "1").require([TableKey::Close]);
        let result = evaluate_strategy(&store(), &spec, None);
        assert!(result.is_failed());
    }

    #[derive(Debug)]
    struct Broken;

    impl Scorer for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn score(&self, _: &Inputs<'_>, candidates: &[Symbol], _: Date) -> Result<Vec<f64>> {
            Ok(vec![f64::NAN; candidates.len()])
        }
    }

    #[test]
    fn test_non_finite_scores_use_fallback() {
        let spec = above(0.0).score_with(Broken);
        let evaluator = Evaluator::new(EvaluatorConfig {
            fallback_score: -1.0,
            ..Default::default()
        });
        let result = evaluator.evaluate(&store(), &spec, Some(d(3)));
        assert_eq!(result.symbols(), vec!["A", "B", "C"]);
        assert!(result.entries.iter().all(|e| e.score == -1.0));
    }

    #[test]
    fn test_constant_scores_order_by_symbol() {
        let spec = above(0.0).score_with(ConstantScorer::new(1.0));
        let result = evaluate_strategy(&store(), &spec, Some(d(3)));
        assert_eq!(result.symbols(), vec!["A", "B", "C"]);
    }
}
