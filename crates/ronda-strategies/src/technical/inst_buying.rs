//! Accumulation: rising price and volume while margin traders sell.

use ronda_align::CompareOp;
use ronda_eval::{Inputs, Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{ChangeKind, change, pct_change, streak, threshold};
use ronda_store::TableKey;
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "inst_buying";

pub(crate) const TABLES: &[TableKey] = &[
    TableKey::Close,
    TableKey::Volume,
    TableKey::MarginBalance,
    TableKey::Eps,
];

/// Thresholds for the accumulation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstBuyingConfig {
    /// Consecutive days each daily signal must hold (default: 2)
    pub days: usize,
    /// Volume must exceed this multiple of its mean (default: 1.5)
    pub volume_multiple: f64,
    /// Rows in the volume mean (default: 20)
    pub volume_days: usize,
    /// Quarters of consecutive EPS growth (default: 2)
    pub eps_quarters: usize,
    /// Close must stay below this (default: 70)
    pub max_close: f64,
}

impl Default for InstBuyingConfig {
    fn default() -> Self {
        Self {
            days: 2,
            volume_multiple: 1.5,
            volume_days: 20,
            eps_quarters: 2,
            max_close: 70.0,
        }
    }
}

/// Price up on heavy volume for consecutive days while margin balance falls.
///
/// Conditions, all at the as-of date and each over the last `days` days:
/// - close up every day
/// - volume above `volume_multiple` times its `volume_days` mean every day
/// - margin balance down every day
///
/// plus EPS up for `eps_quarters` quarters and close below `max_close`.
///
/// Scored by 0.6 z(volume ratio) + 0.4 z(daily change).
#[must_use]
pub fn inst_buying(config: &ScreenConfig) -> StrategySpec {
    let c = config.inst_buying;
    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Consecutive up days on heavy volume with falling margin balance")
        .require(TABLES.iter().copied())
        .condition(format!("close up {} days", c.days), move |inputs| {
            let up = threshold(&pct_change(inputs.table(TableKey::Close)?, 1)?, CompareOp::Gt, 0.0)?;
            streak(&up, c.days)
        })
        .condition(
            format!("volume > {}x mean for {} days", c.volume_multiple, c.days),
            move |inputs| {
                let ratio = metrics::volume_ratio(inputs, c.volume_days)?;
                streak(&threshold(&ratio, CompareOp::Gt, c.volume_multiple)?, c.days)
            },
        )
        .condition(format!("margin balance down {} days", c.days), move |inputs| {
            let diff = change(inputs.table(TableKey::MarginBalance)?, ChangeKind::Diff, 1)?;
            streak(&threshold(&diff, CompareOp::Lt, 0.0)?, c.days)
        })
        .condition(format!("eps up {} quarters", c.eps_quarters), move |inputs| {
            metrics::eps_rising(inputs, c.eps_quarters)
        })
        .condition(format!("close < {}", c.max_close), move |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, c.max_close)
        })
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(
                    0.6,
                    Metric::derived("volume ratio", move |inputs: &Inputs<'_>| {
                        metrics::volume_ratio(inputs, c.volume_days)
                    }),
                )
                .term(
                    0.4,
                    Metric::derived("daily change", |inputs: &Inputs<'_>| {
                        pct_change(inputs.table(TableKey::Close)?, 1)
                    }),
                ),
        );
    config.filters.apply(spec)
}
