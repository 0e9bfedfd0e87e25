//! Low-priced small caps with revenue at a yearly high.

use ronda_align::{ArithOp, CompareOp, arith};
use ronda_eval::{Inputs, Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{RollingStat, rolling, threshold};
use ronda_store::TableKey;
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "low_price_small";

pub(crate) const TABLES: &[TableKey] = &[TableKey::Close, TableKey::Revenue, TableKey::CommonStock];

/// Thresholds for the low-price small-cap strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPriceSmallConfig {
    /// Close must stay below this (default: 20)
    pub max_close: f64,
    /// Months in the revenue high window (default: 12)
    pub revenue_months: usize,
    /// Revenue must reach this share of its high (default: 0.99)
    pub near_high: f64,
    /// Common stock must stay below this, in thousands (default: 2,000,000)
    pub max_common_stock: f64,
}

impl Default for LowPriceSmallConfig {
    fn default() -> Self {
        Self {
            max_close: 20.0,
            revenue_months: 12,
            near_high: 0.99,
            max_common_stock: 2_000_000.0,
        }
    }
}

/// Cheap, small companies whose monthly revenue just hit a 12-month high.
///
/// Scored by 0.4 z(revenue / 12-month high) + 0.3 z(revenue YoY) + 0.3 z(-close),
/// so lower prices rank higher.
#[must_use]
pub fn low_price_small(config: &ScreenConfig) -> StrategySpec {
    let c = config.low_price_small;
    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Close under 20 with revenue at a 12-month high and small share capital")
        .require(TABLES.iter().copied())
        .condition(format!("close < {}", c.max_close), move |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, c.max_close)
        })
        .condition(format!("revenue at {}-month high", c.revenue_months), move |inputs| {
            metrics::near_high(inputs.table(TableKey::Revenue)?, c.revenue_months, c.near_high)
        })
        .condition(format!("common stock < {}", c.max_common_stock), move |inputs| {
            threshold(inputs.table(TableKey::CommonStock)?, CompareOp::Lt, c.max_common_stock)
        })
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(
                    0.4,
                    Metric::derived("revenue to high", move |inputs: &Inputs<'_>| {
                        let revenue = inputs.table(TableKey::Revenue)?;
                        let high = rolling(revenue, RollingStat::Max, c.revenue_months)?;
                        arith(revenue, ArithOp::Div, &high)
                    }),
                )
                .term(0.3, Metric::derived("revenue yoy", metrics::revenue_yoy))
                .term(
                    0.3,
                    Metric::derived("negated close", |inputs: &Inputs<'_>| {
                        let close = inputs.table(TableKey::Close)?;
                        Ok(close.map(close.unit(), |v| -v))
                    }),
                ),
        );
    config.filters.apply(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicFilters;
    use ronda_eval::evaluate_strategy;
    use ronda_store::TableStore;
    use ronda_traits::{Date, Frequency, Table};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(i: u32) -> Date {
        date(2023 + (i / 12) as i32, i % 12 + 1, 10)
    }

    fn store() -> TableStore {
        let rising: Vec<f64> = (0..13).map(|i| 100.0 + f64::from(i)).collect();
        let mut falling = rising.clone();
        falling[12] = 50.0;

        let mut store = TableStore::new();
        store
            .register(
                TableKey::Revenue.name(),
                Table::from_columns(
                    Frequency::Monthly,
                    "thousand TWD",
                    (0..13).map(month).collect(),
                    vec![
                        ("A".to_string(), rising.clone()),
                        ("B".to_string(), rising),
                        ("C".to_string(), falling),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        store
            .register(
                TableKey::Close.name(),
                Table::from_columns(
                    Frequency::Daily,
                    "TWD",
                    vec![date(2024, 1, 15), date(2024, 1, 16)],
                    vec![
                        ("A".to_string(), vec![15.0, 15.5]),
                        ("B".to_string(), vec![25.0, 25.0]),
                        ("C".to_string(), vec![10.0, 10.0]),
                        ("D".to_string(), vec![10.0, 10.0]),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        store
            .register(
                TableKey::CommonStock.name(),
                Table::from_columns(
                    Frequency::Quarterly,
                    "thousand TWD",
                    vec![date(2023, 10, 1)],
                    vec![
                        ("A".to_string(), vec![1_000_000.0]),
                        ("B".to_string(), vec![1_000_000.0]),
                        ("C".to_string(), vec![1_000_000.0]),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_low_price_small_selects_cheap_revenue_high() {
        let config = ScreenConfig {
            filters: BasicFilters::none(),
            ..ScreenConfig::default()
        };
        let spec = low_price_small(&config);
        let result = evaluate_strategy(&store(), &spec, None);
        assert!(!result.is_failed());
        assert_eq!(result.as_of, Some(date(2024, 1, 16)));
        assert_eq!(result.symbols(), vec!["A"]);
    }

    #[test]
    fn test_default_filters_need_market_cap() {
        let spec = low_price_small(&ScreenConfig::default());
        let result = evaluate_strategy(&store(), &spec, None);
        assert!(result.is_failed());
    }
}
