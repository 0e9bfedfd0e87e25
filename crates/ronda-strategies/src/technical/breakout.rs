//! Breakout from a long base.

use ronda_align::{CompareOp, compare, or};
use ronda_eval::{Inputs, Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{RollingStat, lag, rolling, streak, threshold};
use ronda_store::TableKey;
use ronda_traits::{Panel, Result, Table};
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "breakout";

pub(crate) const TABLES: &[TableKey] = &[
    TableKey::Close,
    TableKey::High,
    TableKey::Low,
    TableKey::Volume,
    TableKey::Revenue,
    TableKey::CommonStock,
    TableKey::Roe,
    TableKey::CashDividend,
];

/// Thresholds for the breakout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    /// Trading days in the base (default: 90)
    pub base_days: usize,
    /// Leading part of the base where its low must sit (default: 40)
    pub early_days: usize,
    /// Trading days in the breakout high window (default: 20)
    pub high_days: usize,
    /// Maximum rise of close above the base low (default: 0.25)
    pub max_rise: f64,
    /// Volume must exceed this multiple of its 20-day mean (default: 2.5)
    pub volume_multiple: f64,
    /// Months in the revenue high window (default: 36)
    pub revenue_months: usize,
    /// Close must stay below this (default: 20)
    pub max_close: f64,
    /// Common stock must stay below this, in thousands (default: 2,000,000)
    pub max_common_stock: f64,
    /// ROE in percent that qualifies on its own (default: 25)
    pub min_roe: f64,
    /// Yearly cash dividend that qualifies when paid every year (default: 2)
    pub min_dividend: f64,
    /// Consecutive years of that dividend (default: 3)
    pub dividend_years: usize,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            base_days: 90,
            early_days: 40,
            high_days: 20,
            max_rise: 0.25,
            volume_multiple: 2.5,
            revenue_months: 36,
            max_close: 20.0,
            max_common_stock: 2_000_000.0,
            min_roe: 25.0,
            min_dividend: 2.0,
            dividend_years: 3,
        }
    }
}

/// Tolerance for "at the high" comparisons.
const NEAR_HIGH: f64 = 0.99;

/// Rows over which the volume mean is taken.
const VOLUME_DAYS: usize = 20;

fn base_low(inputs: &Inputs<'_>, days: usize) -> Result<Table> {
    rolling(inputs.table(TableKey::Low)?, RollingStat::Min, days)
}

/// A small, cheap stock leaving a long base on heavy volume.
///
/// Conditions, all at the as-of date:
/// - the `base_days` low was set in the first `early_days` of the base,
///   i.e. it equals the `early_days` low as it stood `base_days - early_days`
///   rows ago
/// - high at (99% of) its `high_days` high
/// - close less than `max_rise` above the base low
/// - volume above `volume_multiple` times its 20-day mean
/// - revenue at (99% of) its `revenue_months` high
/// - close below `max_close`, common stock below `max_common_stock`
/// - ROE above `min_roe`, or a cash dividend above `min_dividend` in each of
///   the last `dividend_years` years of the dividend table; a year without
///   a record breaks the run
///
/// Scored by 0.4 z(breakout strength) + 0.3 z(volume ratio) + 0.3 z(revenue YoY).
#[must_use]
pub fn breakout(config: &ScreenConfig) -> StrategySpec {
    let c = config.breakout;
    let shift = c.base_days.saturating_sub(c.early_days);
    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Long base without a new low, breaking out on volume with revenue at a high")
        .require(TABLES.iter().copied())
        .condition(
            format!("{}-day low set in first {} days", c.base_days, c.early_days),
            move |inputs| {
                let base = base_low(inputs, c.base_days)?;
                let early = lag(&base_low(inputs, c.early_days)?, shift)?;
                compare(&base, CompareOp::Eq, &early)
            },
        )
        .condition(format!("high at {}-day high", c.high_days), move |inputs| {
            metrics::near_high(inputs.table(TableKey::High)?, c.high_days, NEAR_HIGH)
        })
        .condition(format!("rise from base < {}", c.max_rise), move |inputs| {
            let base = base_low(inputs, c.base_days)?;
            let rise = metrics::relative_to(inputs.table(TableKey::Close)?, &base)?;
            threshold(&rise, CompareOp::Lt, c.max_rise)
        })
        .condition(format!("volume > {}x mean", c.volume_multiple), move |inputs| {
            threshold(&metrics::volume_ratio(inputs, VOLUME_DAYS)?, CompareOp::Gt, c.volume_multiple)
        })
        .condition(format!("revenue at {}-month high", c.revenue_months), move |inputs| {
            metrics::near_high(inputs.table(TableKey::Revenue)?, c.revenue_months, NEAR_HIGH)
        })
        .condition(format!("close < {}", c.max_close), move |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, c.max_close)
        })
        .condition(format!("common stock < {}", c.max_common_stock), move |inputs| {
            threshold(inputs.table(TableKey::CommonStock)?, CompareOp::Lt, c.max_common_stock)
        })
        .condition(
            format!(
                "roe > {} or dividend > {} for {} years",
                c.min_roe, c.min_dividend, c.dividend_years
            ),
            move |inputs| {
                let roe = threshold(inputs.table(TableKey::Roe)?, CompareOp::Gt, c.min_roe)?;
                let paying = threshold(inputs.table(TableKey::CashDividend)?, CompareOp::Gt, c.min_dividend)?;
                // Symbols with no dividend history still pass on ROE alone.
                let dividend = streak(&paying, c.dividend_years)?
                    .reindex_symbols(roe.symbols(), Some(false))?;
                or(&roe, &dividend)
            },
        )
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(
                    0.4,
                    Metric::derived("breakout strength", move |inputs: &Inputs<'_>| {
                        let high = inputs.table(TableKey::High)?;
                        let recent = rolling(high, RollingStat::Max, c.high_days)?;
                        metrics::relative_to(high, &recent)
                    }),
                )
                .term(
                    0.3,
                    Metric::derived("volume ratio", |inputs: &Inputs<'_>| {
                        metrics::volume_ratio(inputs, VOLUME_DAYS)
                    }),
                )
                .term(0.3, Metric::derived("revenue yoy", metrics::revenue_yoy)),
        );
    config.filters.apply(spec)
}
