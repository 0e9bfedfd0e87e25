#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the ronda screener.
//!
//! This crate provides the data model every other ronda crate builds on:
//! frequency-tagged [`Table`]s, derived [`Condition`]s, the [`Panel`] read
//! interface used for alignment, and the [`RondaError`] taxonomy.

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod condition;
pub mod error;
pub mod panel;
pub mod stats;
pub mod table;
pub mod types;

// Re-exports
pub use condition::Condition;
pub use error::{Result, RondaError};
pub use panel::Panel;
pub use table::Table;
pub use types::{CategoryMap, Date, Frequency, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_core_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Table>();
        assert_send_sync::<Condition>();
    }
}
