//! Sustained cash build-up.

use ronda_align::CompareOp;
use ronda_eval::{Inputs, Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{RollingStat, pct_change, rolling, streak, threshold};
use ronda_store::TableKey;
use ronda_traits::{Result, Table};
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "cash_growth";

pub(crate) const TABLES: &[TableKey] = &[
    TableKey::Cash,
    TableKey::Revenue,
    TableKey::Eps,
    TableKey::OperatingCashFlow,
    TableKey::Roe,
];

/// Thresholds for the cash growth strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashGrowthConfig {
    /// Minimum quarter-over-quarter cash growth (default: 0.05)
    pub min_cash_growth: f64,
    /// Consecutive quarters that must clear it (default: 4)
    pub quarters: usize,
    /// Minimum revenue MoM (default: 0.20)
    pub min_mom: f64,
    /// Quarters of consecutive EPS growth (default: 2)
    pub eps_quarters: usize,
    /// Minimum ROE in percent (default: 10)
    pub min_roe: f64,
}

impl Default for CashGrowthConfig {
    fn default() -> Self {
        Self {
            min_cash_growth: 0.05,
            quarters: 4,
            min_mom: 0.20,
            eps_quarters: 2,
            min_roe: 10.0,
        }
    }
}

fn cash_qoq(inputs: &Inputs<'_>) -> Result<Table> {
    pct_change(inputs.table(TableKey::Cash)?, 1)
}

/// Cash growing every quarter, with revenue, earnings and cash flow behind it.
///
/// Conditions, all at the as-of date:
/// - cash QoQ growth above `min_cash_growth` for `quarters` quarters running
/// - revenue MoM above `min_mom`
/// - EPS up for `eps_quarters` quarters in a row
/// - positive operating cash flow
/// - ROE above `min_roe`
///
/// Scored by 0.4 z(trailing mean cash growth) + 0.3 z(MoM) + 0.3 z(operating cash flow).
#[must_use]
pub fn cash_growth(config: &ScreenConfig) -> StrategySpec {
    let c = config.cash_growth;
    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Cash up every quarter with strong revenue, rising EPS and positive cash flow")
        .require(TABLES.iter().copied())
        .condition(
            format!("cash qoq > {} for {} quarters", c.min_cash_growth, c.quarters),
            move |inputs| {
                let growing = threshold(&cash_qoq(inputs)?, CompareOp::Gt, c.min_cash_growth)?;
                streak(&growing, c.quarters)
            },
        )
        .condition(format!("revenue mom > {}", c.min_mom), move |inputs| {
            threshold(&metrics::revenue_mom(inputs)?, CompareOp::Gt, c.min_mom)
        })
        .condition(format!("eps up {} quarters", c.eps_quarters), move |inputs| {
            metrics::eps_rising(inputs, c.eps_quarters)
        })
        .condition("operating cash flow > 0", |inputs| {
            threshold(inputs.table(TableKey::OperatingCashFlow)?, CompareOp::Gt, 0.0)
        })
        .condition(format!("roe > {}", c.min_roe), move |inputs| {
            threshold(inputs.table(TableKey::Roe)?, CompareOp::Gt, c.min_roe)
        })
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(
                    0.4,
                    Metric::derived("mean cash growth", move |inputs: &Inputs<'_>| {
                        rolling(&cash_qoq(inputs)?, RollingStat::Mean, c.quarters)
                    }),
                )
                .term(0.3, Metric::derived("revenue mom", metrics::revenue_mom))
                .term(0.3, Metric::table(TableKey::OperatingCashFlow)),
        );
    config.filters.apply(spec)
}
