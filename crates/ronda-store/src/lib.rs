//! Snapshot storage for the ronda screener.
//!
//! This crate owns everything that happens before a strategy runs:
//! - [`TableStore`]: named, immutable tables (and category mappings) for one snapshot
//! - [`TableKey`]: the closed registry of `dataset:field` table addresses
//! - [`events`]: conversion of period-labelled event records into tables
//! - [`frame`]: conversion between long-format polars frames and tables
//!
//! # Example
//!
//! ```rust,ignore
//! use ronda_store::{TableKey, TableStore, frame::table_from_frame};
//!
//! let mut store = TableStore::new();
//! let close = table_from_frame(&prices, "close", Frequency::Daily, "TWD")?;
//! store.register(TableKey::Close.name(), close)?;
//! ```

pub mod events;
pub mod frame;
pub mod registry;
mod store;

pub use registry::{Dataset, TableInfo, TableKey, available_tables, get_table_info};
pub use ronda_traits::CategoryMap;
pub use store::TableStore;
