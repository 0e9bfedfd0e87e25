//! Revenue momentum ahead of the industry.

use ronda_align::CompareOp;
use ronda_eval::{Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{RollingStat, peer_relative, rolling, threshold};
use ronda_store::TableKey;
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "revenue_momentum";

pub(crate) const TABLES: &[TableKey] = &[
    TableKey::Revenue,
    TableKey::Industry,
    TableKey::Eps,
    TableKey::Close,
];

/// Thresholds for the revenue momentum strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueMomentumConfig {
    /// Minimum year-over-year monthly revenue growth (default: 0.20)
    pub min_yoy: f64,
    /// Minimum month-over-month revenue growth (default: 0.20)
    pub min_mom: f64,
    /// Months in the trailing YoY mean compared with the industry (default: 3)
    pub trailing_months: usize,
    /// Quarters of consecutive EPS growth (default: 2)
    pub eps_quarters: usize,
    /// Close must stay below this (default: 100)
    pub max_close: f64,
}

impl Default for RevenueMomentumConfig {
    fn default() -> Self {
        Self {
            min_yoy: 0.20,
            min_mom: 0.20,
            trailing_months: 3,
            eps_quarters: 2,
            max_close: 100.0,
        }
    }
}

/// Fast-growing revenue that also beats the industry's recent growth.
///
/// Conditions, all at the as-of date:
/// - revenue YoY and MoM above their minimums
/// - trailing mean of YoY above the mean of the symbol's industry
/// - EPS up for `eps_quarters` quarters in a row
/// - close below `max_close`
///
/// Scored by 0.6 z(YoY) + 0.4 z(MoM).
#[must_use]
pub fn revenue_momentum(config: &ScreenConfig) -> StrategySpec {
    let c = config.revenue_momentum;
    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Revenue YoY and MoM growth ahead of the industry, rising EPS, low price")
        .require(TABLES.iter().copied())
        .condition(format!("revenue yoy > {}", c.min_yoy), move |inputs| {
            threshold(&metrics::revenue_yoy(inputs)?, CompareOp::Gt, c.min_yoy)
        })
        .condition(format!("revenue mom > {}", c.min_mom), move |inputs| {
            threshold(&metrics::revenue_mom(inputs)?, CompareOp::Gt, c.min_mom)
        })
        .condition(
            format!("{}-month yoy above industry mean", c.trailing_months),
            move |inputs| {
                let trailing = rolling(&metrics::revenue_yoy(inputs)?, RollingStat::Mean, c.trailing_months)?;
                peer_relative(&trailing, inputs.categories(TableKey::Industry)?, CompareOp::Gt)
            },
        )
        .condition(format!("eps up {} quarters", c.eps_quarters), move |inputs| {
            metrics::eps_rising(inputs, c.eps_quarters)
        })
        .condition(format!("close < {}", c.max_close), move |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, c.max_close)
        })
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(0.6, Metric::derived("revenue yoy", metrics::revenue_yoy))
                .term(0.4, Metric::derived("revenue mom", metrics::revenue_mom)),
        );
    config.filters.apply(spec)
}
