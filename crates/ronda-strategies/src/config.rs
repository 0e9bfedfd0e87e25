//! Screening configuration.

use ronda_eval::DEFAULT_DEGENERATE_SCORE;
use serde::{Deserialize, Serialize};

use crate::{
    filters::BasicFilters,
    growth::{CapitalIncreaseConfig, CashGrowthConfig, RevenueMomentumConfig},
    technical::{BreakoutConfig, InstBuyingConfig},
    value::LowPriceSmallConfig,
};

/// Configuration for the built-in strategy catalog.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "filters": { "min_market_cap": 1e9 }, "breakout": { "max_close": 30 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Filters shared by every strategy
    pub filters: BasicFilters,
    /// `revenue_momentum` thresholds
    pub revenue_momentum: RevenueMomentumConfig,
    /// `low_price_small` thresholds
    pub low_price_small: LowPriceSmallConfig,
    /// `breakout` thresholds
    pub breakout: BreakoutConfig,
    /// `inst_buying` thresholds
    pub inst_buying: InstBuyingConfig,
    /// `capital_increase` thresholds
    pub capital_increase: CapitalIncreaseConfig,
    /// `cash_growth` thresholds
    pub cash_growth: CashGrowthConfig,
    /// Per-metric score when a metric has no spread over the candidates (default: 50)
    pub degenerate_score: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            filters: BasicFilters::default(),
            revenue_momentum: RevenueMomentumConfig::default(),
            low_price_small: LowPriceSmallConfig::default(),
            breakout: BreakoutConfig::default(),
            inst_buying: InstBuyingConfig::default(),
            capital_increase: CapitalIncreaseConfig::default(),
            cash_growth: CashGrowthConfig::default(),
            degenerate_score: DEFAULT_DEGENERATE_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = ScreenConfig::default();
        assert_eq!(config.filters.min_market_cap, Some(5e8));
        assert_eq!(config.filters.liquidity_percentile, Some(0.3));
        assert_eq!(config.filters.min_price, None);
        assert_relative_eq!(config.degenerate_score, 50.0);
    }

    #[test]
    fn test_partial_json() {
        let config: ScreenConfig = serde_json::from_str(
            r#"{ "filters": { "min_market_cap": 1e9 }, "breakout": { "max_close": 30 } }"#,
        )
        .unwrap();
        assert_eq!(config.filters.min_market_cap, Some(1e9));
        assert_eq!(config.filters.liquidity_percentile, Some(0.3));
        assert_relative_eq!(config.breakout.max_close, 30.0);
        assert_eq!(config.revenue_momentum, RevenueMomentumConfig::default());
        assert_relative_eq!(config.degenerate_score, 50.0);
    }

    #[test]
    fn test_disable_filter_with_null() {
        let config: ScreenConfig =
            serde_json::from_str(r#"{ "filters": { "min_market_cap": null } }"#).unwrap();
        assert_eq!(config.filters.min_market_cap, None);
    }
}
