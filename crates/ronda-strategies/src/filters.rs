//! Universe filters applied by every built-in strategy.

use ronda_align::CompareOp;
use ronda_eval::StrategySpec;
use ronda_predicates::{RollingStat, quantile_floor, rolling, threshold};
use ronda_store::TableKey;
use serde::{Deserialize, Serialize};

/// Market-wide filters shared by the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicFilters {
    /// Minimum latest market cap (default: 5e8)
    pub min_market_cap: Option<f64>,
    /// Keep symbols whose mean volume is at or above this cross-sectional
    /// quantile (default: 0.3)
    pub liquidity_percentile: Option<f64>,
    /// Rows in the mean-volume window (default: 20)
    pub liquidity_window: usize,
    /// Minimum latest close (default: unset)
    pub min_price: Option<f64>,
}

impl Default for BasicFilters {
    fn default() -> Self {
        Self {
            min_market_cap: Some(5e8),
            liquidity_percentile: Some(0.3),
            liquidity_window: 20,
            min_price: None,
        }
    }
}

impl BasicFilters {
    /// No filtering at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_market_cap: None,
            liquidity_percentile: None,
            liquidity_window: 20,
            min_price: None,
        }
    }

    /// Append the enabled filters to `spec`, declaring the tables they read.
    #[must_use]
    pub fn apply(&self, mut spec: StrategySpec) -> StrategySpec {
        if let Some(min) = self.min_price {
            spec = spec
                .require([TableKey::Close])
                .condition(format!("close >= {min}"), move |inputs| {
                    threshold(inputs.table(TableKey::Close)?, CompareOp::Ge, min)
                });
        }
        if let Some(min) = self.min_market_cap {
            spec = spec
                .require([TableKey::MarketCap])
                .condition(format!("market cap >= {min}"), move |inputs| {
                    threshold(inputs.table(TableKey::MarketCap)?, CompareOp::Ge, min)
                });
        }
        if let Some(q) = self.liquidity_percentile {
            let window = self.liquidity_window;
            spec = spec.require([TableKey::Volume]).condition(
                format!("{window}-day mean volume in top {:.0}%", (1.0 - q) * 100.0),
                move |inputs| {
                    let mean = rolling(inputs.table(TableKey::Volume)?, RollingStat::Mean, window)?;
                    quantile_floor(&mean, q)
                },
            );
        }
        spec
    }
}
