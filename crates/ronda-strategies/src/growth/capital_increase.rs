//! Recent capital increase backed by cash and profitability.

use ronda_align::CompareOp;
use ronda_eval::{Inputs, Metric, StrategySpec, WeightedZScore};
use ronda_predicates::{RollingStat, pct_change, rolling, threshold};
use ronda_store::TableKey;
use ronda_traits::{Result, Table};
use serde::{Deserialize, Serialize};

use crate::{ScreenConfig, metrics};

pub(crate) const NAME: &str = "capital_increase";

pub(crate) const TABLES: &[TableKey] = &[
    TableKey::CommonStock,
    TableKey::Cash,
    TableKey::Roe,
    TableKey::Revenue,
];

/// Thresholds for the capital increase strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalIncreaseConfig {
    /// Quarters searched for the largest increase (default: 3)
    pub window: usize,
    /// Minimum largest quarterly common-stock growth (default: 0.05)
    pub min_stock_growth: f64,
    /// Minimum largest quarterly cash growth (default: 0.20)
    pub min_cash_growth: f64,
    /// Minimum ROE in percent (default: 10)
    pub min_roe: f64,
    /// Minimum revenue YoY (default: 0)
    pub min_revenue_yoy: f64,
}

impl Default for CapitalIncreaseConfig {
    fn default() -> Self {
        Self {
            window: 3,
            min_stock_growth: 0.05,
            min_cash_growth: 0.20,
            min_roe: 10.0,
            min_revenue_yoy: 0.0,
        }
    }
}

fn max_growth(table: &Table, window: usize) -> Result<Table> {
    rolling(&pct_change(table, 1)?, RollingStat::Max, window)
}

/// Companies that recently raised capital and grew cash with it.
///
/// Conditions, all at the as-of date:
/// - the largest quarterly common-stock growth in the last `window`
///   quarters exceeds `min_stock_growth`
/// - the same for cash, against `min_cash_growth`
/// - ROE above `min_roe`
/// - revenue YoY above `min_revenue_yoy`
///
/// Scored by 0.4 z(stock growth) + 0.3 z(cash growth) + 0.3 z(ROE).
#[must_use]
pub fn capital_increase(config: &ScreenConfig) -> StrategySpec {
    let c = config.capital_increase;
    let stock_growth = move |inputs: &Inputs<'_>| max_growth(inputs.table(TableKey::CommonStock)?, c.window);
    let cash_growth = move |inputs: &Inputs<'_>| max_growth(inputs.table(TableKey::Cash)?, c.window);

    let spec = StrategySpec::new(NAME, "1.0.0")
        .describe("Recent common-stock increase with matching cash growth, profitable and growing")
        .require(TABLES.iter().copied())
        .condition(
            format!("max {}q stock growth > {}", c.window, c.min_stock_growth),
            move |inputs| threshold(&stock_growth(inputs)?, CompareOp::Gt, c.min_stock_growth),
        )
        .condition(
            format!("max {}q cash growth > {}", c.window, c.min_cash_growth),
            move |inputs| threshold(&cash_growth(inputs)?, CompareOp::Gt, c.min_cash_growth),
        )
        .condition(format!("roe > {}", c.min_roe), move |inputs| {
            threshold(inputs.table(TableKey::Roe)?, CompareOp::Gt, c.min_roe)
        })
        .condition(format!("revenue yoy > {}", c.min_revenue_yoy), move |inputs| {
            threshold(&metrics::revenue_yoy(inputs)?, CompareOp::Gt, c.min_revenue_yoy)
        })
        .score_with(
            WeightedZScore::new()
                .degenerate_score(config.degenerate_score)
                .term(0.4, Metric::derived("stock growth", stock_growth))
                .term(0.3, Metric::derived("cash growth", cash_growth))
                .term(0.3, Metric::table(TableKey::Roe)),
        );
    config.filters.apply(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicFilters;
    use ronda_eval::evaluate_strategy;
    use ronda_store::TableStore;
    use ronda_traits::{Date, Frequency};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarters() -> Vec<Date> {
        vec![
            date(2023, 3, 31),
            date(2023, 6, 30),
            date(2023, 9, 30),
            date(2023, 12, 31),
        ]
    }

    fn quarterly(columns: Vec<(&str, Vec<f64>)>) -> Table {
        Table::from_columns(
            Frequency::Quarterly,
            "thousand TWD",
            quarters(),
            columns.into_iter().map(|(s, v)| (s.to_string(), v)).collect(),
        )
        .unwrap()
    }

    fn store() -> TableStore {
        let mut store = TableStore::new();
        store
            .register(
                TableKey::CommonStock.name(),
                quarterly(vec![
                    ("A", vec![100.0, 100.0, 110.0, 110.0]),
                    ("B", vec![100.0; 4]),
                ]),
            )
            .unwrap();
        store
            .register(
                TableKey::Cash.name(),
                quarterly(vec![
                    ("A", vec![100.0, 100.0, 130.0, 130.0]),
                    ("B", vec![100.0, 100.0, 130.0, 130.0]),
                ]),
            )
            .unwrap();
        store
            .register(
                TableKey::Roe.name(),
                quarterly(vec![("A", vec![15.0; 4]), ("B", vec![15.0; 4])]),
            )
            .unwrap();
        let revenue: Vec<f64> = (0..13).map(|i| 100.0 + f64::from(i)).collect();
        store
            .register(
                TableKey::Revenue.name(),
                Table::from_columns(
                    Frequency::Monthly,
                    "thousand TWD",
                    (0..13u32)
                        .map(|i| date(2023 + (i / 12) as i32, i % 12 + 1, 10))
                        .collect(),
                    vec![("A".to_string(), revenue.clone()), ("B".to_string(), revenue)],
                )
                .unwrap(),
            )
            .unwrap();
        store
    }

    fn config() -> ScreenConfig {
        ScreenConfig {
            filters: BasicFilters::none(),
            ..ScreenConfig::default()
        }
    }

    #[test]
    fn test_needs_a_capital_increase() {
        let result = evaluate_strategy(&store(), &capital_increase(&config()), None);
        assert!(!result.is_failed());
        assert_eq!(result.as_of, Some(date(2024, 1, 10)));
        assert_eq!(result.symbols(), vec!["A"]);
    }

    #[test]
    fn test_no_revenue_yoy_before_a_full_year() {
        let result = evaluate_strategy(
            &store(),
            &capital_increase(&config()),
            Some(date(2023, 12, 31)),
        );
        assert!(result.is_empty());
    }
}
