#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ronda
//!
//! ronda is an umbrella crate that re-exports all ronda sub-crates for
//! convenience.
//!
//! ## Quick Start
//!
//! ```
//! use ronda::prelude::*;
//! use ronda::predicates::threshold;
//!
//! let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
//! let close = Table::from_columns(
//!     Frequency::Daily,
//!     "TWD",
//!     vec![d(1), d(2), d(3)],
//!     vec![("X".to_string(), vec![100.0, 110.0, 120.0])],
//! )?;
//!
//! let mut store = TableStore::new();
//! store.register(TableKey::Close.name(), close)?;
//!
//! let spec = StrategySpec::new("above_105", "1.0.0")
//!     .require([TableKey::Close])
//!     .condition("close > 105", |inputs| {
//!         threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, 105.0)
//!     });
//!
//! assert!(evaluate_strategy(&store, &spec, Some(d(1))).is_empty());
//! assert_eq!(evaluate_strategy(&store, &spec, Some(d(2))).symbols(), vec!["X"]);
//! # Ok::<(), RondaError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types ([`Table`], [`Condition`], [`Panel`]) and errors
//! - [`store`] - Snapshot [`TableStore`], [`TableKey`] registry, event tables
//! - [`align`] - Alignment engine: as-of joins, comparisons, AND/OR
//! - [`predicates`] - Threshold, rolling, change, growth and peer builders
//! - [`eval`] - Strategy evaluation and batch aggregation
//! - [`strategies`] - The built-in strategy catalog
//! - [`data`] - Snapshot providers (JSON directory, HTTP)
//!
//! ## Architecture
//!
//! 1. **Providers** fetch table payloads and load them into a fresh store
//! 2. **Predicates** derive conditions from aligned tables
//! 3. **Strategies** AND their conditions and score the candidates at the
//!    as-of date
//! 4. **Batches** run strategies in parallel and rank symbols by how many
//!    strategies picked them

/// Version information for the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types for ronda.
///
/// - [`Table`] - frequency-tagged `time x symbol` matrix, `NaN` for undefined
/// - [`Condition`] - derived tri-state matrix, read as boolean
/// - [`Panel`] - the as-of read interface both share
pub mod traits {
    pub use ronda_traits::*;
}

pub use ronda_traits::{
    CategoryMap, Condition, Date, Frequency, Panel, Result, RondaError, Symbol, Table,
};

// ============================================================================
// Storage
// ============================================================================

/// Snapshot storage.
///
/// Tables are registered once per snapshot under their `dataset:field`
/// address and never change afterwards.
pub mod store {
    pub use ronda_store::*;
}

pub use ronda_store::{TableKey, TableStore};

// ============================================================================
// Alignment and Predicates
// ============================================================================

/// Alignment engine.
///
/// Binary operations align both operands on the union of their time
/// indices and the intersection of their symbols. Each value is carried
/// forward from its most recent observation, never from a later one.
pub mod align {
    pub use ronda_align::*;
}

/// Condition and derived-table builders.
pub mod predicates {
    pub use ronda_predicates::*;
}

// ============================================================================
// Evaluation
// ============================================================================

/// Strategy evaluation and aggregation.
///
/// ## Ordering
///
/// A single strategy ranks by score descending, ties by symbol. A batch
/// report ranks by:
///
/// ```text
/// appearance_count desc, average_score desc, symbol asc
/// ```
pub mod eval {
    pub use ronda_eval::*;
}

pub use ronda_eval::{
    AggregateReport, BatchConfig, RankedResult, StrategySpec, evaluate_strategy, run_batch,
};

// ============================================================================
// Strategies
// ============================================================================

/// Built-in strategies.
///
/// ```
/// use ronda::strategies::{ScreenConfig, available_strategies};
///
/// assert_eq!(available_strategies().len(), 6);
/// assert_eq!(ScreenConfig::default().filters.min_market_cap, Some(5e8));
/// ```
pub mod strategies {
    pub use ronda_strategies::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Snapshot acquisition.
///
/// ## Setup
///
/// For [`HttpProvider`](ronda_data::HttpProvider), set `RONDA_API_URL` and
/// `RONDA_API_TOKEN` in the environment or a `.env` file. For local
/// snapshots, point a [`JsonDirProvider`](ronda_data::JsonDirProvider) at a
/// directory of `<dataset>/<field>.json` files.
pub mod data {
    pub use ronda_data::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use ronda::prelude::*;
/// ```
pub mod prelude {
    pub use crate::align::{ArithOp, CompareOp};
    pub use crate::eval::{BatchConfig, StrategySpec, evaluate_strategy, run_batch};
    pub use crate::{
        Condition, Date, Frequency, Panel, Result, RondaError, Symbol, Table, TableKey, TableStore,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        fn _accept_table(_table: &impl Panel<Value = f64>) {}
        fn _accept_scorer(_scorer: &dyn eval::Scorer) {}
        fn _accept_provider(_provider: &dyn data::SnapshotProvider) {}
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let error = RondaError::InvalidData("test".to_string());
        assert!(!error.is_not_found());
    }
}
