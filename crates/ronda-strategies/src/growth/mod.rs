//! Growth strategies driven by revenue, cash and capital.
//!
//! - Revenue momentum: monthly revenue accelerating faster than the industry
//! - Capital increase: a recent share issue matched by cash growth
//! - Cash growth: cash rising quarter after quarter

mod capital_increase;
mod cash_growth;
mod revenue_momentum;

pub use capital_increase::{CapitalIncreaseConfig, capital_increase};
pub use cash_growth::{CashGrowthConfig, cash_growth};
pub use revenue_momentum::{RevenueMomentumConfig, revenue_momentum};

pub(crate) use capital_increase::{NAME as CAPITAL_INCREASE, TABLES as CAPITAL_INCREASE_TABLES};
pub(crate) use cash_growth::{NAME as CASH_GROWTH, TABLES as CASH_GROWTH_TABLES};
pub(crate) use revenue_momentum::{NAME as REVENUE_MOMENTUM, TABLES as REVENUE_MOMENTUM_TABLES};
