//! Predicate library for the ronda screener.
//!
//! Builders that turn a [`Table`](ronda_traits::Table) into a derived table or
//! a [`Condition`](ronda_traits::Condition):
//! - Threshold: [`threshold`] (`value OP constant`)
//! - Rolling: [`rolling`] min, max or mean over the last `N` rows
//! - Change: [`change`], [`pct_change`], [`lag`] relative to `k` rows back
//! - Growth: [`consecutive_growth`] and [`streak`]
//! - Peer group: [`peer_mean`] and [`peer_relative`] against category means
//! - Cross-section: [`quantile_floor`] against each row's quantile
//!
//! Windows and offsets are counted on a table's native index, so the same
//! builder means trading days on a daily table and quarters on a quarterly
//! one. Results keep the input's index and frequency; combine them across
//! frequencies with `ronda-align`.
//!
//! Derived tables and rolling conditions leave a cell undefined when their
//! inputs are insufficient (short history, gaps, zero base). Comparisons
//! against a constant or a peer group turn an undefined value into `false`.
//! Undefined cells read as `false`.

mod columns;

pub mod change;
pub mod cross_section;
pub mod growth;
pub mod peer;
pub mod rolling;
pub mod threshold;

pub use change::{ChangeKind, change, lag, pct_change};
pub use cross_section::quantile_floor;
pub use growth::{consecutive_growth, streak};
pub use peer::{peer_mean, peer_relative};
pub use rolling::{RollingStat, rolling};
pub use threshold::threshold;
