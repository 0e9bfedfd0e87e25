//! Strategy registry for discovering and building the built-in strategies.

use ronda_eval::StrategySpec;
use ronda_store::TableKey;
use ronda_traits::{Result, RondaError};
use serde::Serialize;

use crate::{
    ScreenConfig,
    growth::{self, CAPITAL_INCREASE, CASH_GROWTH, REVENUE_MOMENTUM},
    technical::{self, BREAKOUT, INST_BUYING},
    value::{self, LOW_PRICE_SMALL},
};

/// Strategy category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    /// Revenue, cash and capital growth
    Growth,
    /// Price and volume patterns
    Technical,
    /// Cheap small caps
    Value,
}

impl StrategyCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Growth => "Revenue, cash and capital growth screens",
            Self::Technical => "Price, volume and margin pattern screens",
            Self::Value => "Low-price and small-capital screens",
        }
    }
}

/// Metadata about a built-in strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    /// Unique identifier, as accepted by [`build_strategy`]
    pub name: &'static str,

    /// Category classification
    pub category: StrategyCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Tables the strategy reads, not counting the shared filters
    pub tables: &'static [TableKey],
}

/// Get information about all built-in strategies, in catalog order.
#[must_use]
pub fn available_strategies() -> Vec<StrategyInfo> {
    vec![
        StrategyInfo {
            name: REVENUE_MOMENTUM,
            category: StrategyCategory::Growth,
            description: "Revenue YoY and MoM above 20%, trailing YoY ahead of the industry",
            tables: growth::REVENUE_MOMENTUM_TABLES,
        },
        StrategyInfo {
            name: LOW_PRICE_SMALL,
            category: StrategyCategory::Value,
            description: "Close under 20, revenue at a 12-month high, small share capital",
            tables: value::LOW_PRICE_SMALL_TABLES,
        },
        StrategyInfo {
            name: BREAKOUT,
            category: StrategyCategory::Technical,
            description: "90-day base without a new low, breaking out on 2.5x volume",
            tables: technical::BREAKOUT_TABLES,
        },
        StrategyInfo {
            name: INST_BUYING,
            category: StrategyCategory::Technical,
            description: "Two up days on heavy volume while margin balance falls",
            tables: technical::INST_BUYING_TABLES,
        },
        StrategyInfo {
            name: CAPITAL_INCREASE,
            category: StrategyCategory::Growth,
            description: "Recent capital increase with cash growth, ROE above 10",
            tables: growth::CAPITAL_INCREASE_TABLES,
        },
        StrategyInfo {
            name: CASH_GROWTH,
            category: StrategyCategory::Growth,
            description: "Cash up over 5% for four quarters running with positive cash flow",
            tables: growth::CASH_GROWTH_TABLES,
        },
    ]
}

/// Get all strategies in a specific category.
#[must_use]
pub fn strategies_by_category(category: StrategyCategory) -> Vec<StrategyInfo> {
    available_strategies()
        .into_iter()
        .filter(|info| info.category == category)
        .collect()
}

/// Get information about a specific strategy by name.
#[must_use]
pub fn get_strategy_info(name: &str) -> Option<StrategyInfo> {
    available_strategies()
        .into_iter()
        .find(|info| info.name == name)
}

/// Build a built-in strategy by name.
///
/// # Errors
///
/// Returns [`RondaError::NotFound`] for an unknown name.
pub fn build_strategy(name: &str, config: &ScreenConfig) -> Result<StrategySpec> {
    let spec = match name {
        REVENUE_MOMENTUM => growth::revenue_momentum(config),
        LOW_PRICE_SMALL => value::low_price_small(config),
        BREAKOUT => technical::breakout(config),
        INST_BUYING => technical::inst_buying(config),
        CAPITAL_INCREASE => growth::capital_increase(config),
        CASH_GROWTH => growth::cash_growth(config),
        _ => return Err(RondaError::NotFound(format!("strategy {name}"))),
    };
    tracing::debug!(
        strategy = name,
        conditions = spec.steps().len(),
        tables = spec.required().len(),
        "built strategy"
    );
    Ok(spec)
}

/// Build every built-in strategy, in catalog order.
#[must_use]
pub fn build_all(config: &ScreenConfig) -> Vec<StrategySpec> {
    available_strategies()
        .iter()
        .filter_map(|info| build_strategy(info.name, config).ok())
        .collect()
}

/// Every table any built-in strategy or the shared filters may read.
#[must_use]
pub fn required_tables(config: &ScreenConfig) -> Vec<TableKey> {
    let mut keys: Vec<TableKey> = build_all(config)
        .iter()
        .flat_map(|spec| spec.required().iter().copied())
        .collect();
    keys.sort_by_key(|key| key.name());
    keys.dedup();
    keys
}
