//! Built-in screening strategies for ronda.
//!
//! Six declarative strategies for the Taiwan equity market, grouped by what
//! they look for:
//! - Growth: revenue momentum, capital increase, cash growth
//! - Technical: breakout from a base, accumulation on volume
//! - Value: low-priced small caps
//!
//! Every strategy also applies the shared [`BasicFilters`] (market cap and
//! liquidity by default). Thresholds live in [`ScreenConfig`].
//!
//! # Example
//!
//! ```
//! use ronda_strategies::{ScreenConfig, available_strategies, build_strategy};
//!
//! let config = ScreenConfig::default();
//! for info in available_strategies() {
//!     let spec = build_strategy(info.name, &config).unwrap();
//!     assert_eq!(spec.name(), info.name);
//! }
//! assert!(build_strategy("unknown", &config).is_err());
//! ```

pub mod filters;
pub mod growth;
pub mod metrics;
pub mod registry;
pub mod technical;
pub mod value;

mod config;

pub use config::ScreenConfig;
pub use filters::BasicFilters;
pub use registry::{
    StrategyCategory, StrategyInfo, available_strategies, build_all, build_strategy,
    get_strategy_info, required_tables, strategies_by_category,
};
