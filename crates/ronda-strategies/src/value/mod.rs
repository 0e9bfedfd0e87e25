//! Cheap, small-cap strategies.

mod low_price_small;

pub use low_price_small::{LowPriceSmallConfig, low_price_small};

pub(crate) use low_price_small::{NAME as LOW_PRICE_SMALL, TABLES as LOW_PRICE_SMALL_TABLES};
