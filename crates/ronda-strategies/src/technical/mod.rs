//! Price and volume pattern strategies.

mod breakout;
mod inst_buying;

pub use breakout::{BreakoutConfig, breakout};
pub use inst_buying::{InstBuyingConfig, inst_buying};

pub(crate) use breakout::{NAME as BREAKOUT, TABLES as BREAKOUT_TABLES};
pub(crate) use inst_buying::{NAME as INST_BUYING, TABLES as INST_BUYING_TABLES};
