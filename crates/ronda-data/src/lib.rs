//! Snapshot acquisition for the ronda screener.
//!
//! The screening core never does I/O. This crate fetches the tables a batch
//! needs from a [`SnapshotProvider`] and loads them into a fresh
//! [`TableStore`](ronda_store::TableStore):
//!
//! - [`JsonDirProvider`]: a directory of `<dataset>/<field>.json` payloads
//! - [`HttpProvider`]: a data service at `<base>/tables/<dataset>/<field>`
//! - [`MemoryProvider`]: payloads held in memory
//!
//! # Usage
//!
//! ```rust,ignore
//! use ronda_data::{HttpProvider, SnapshotOptions, load_snapshot};
//! use ronda_store::TableKey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = HttpProvider::from_env()?;
//!     let keys = [TableKey::Close, TableKey::Revenue, TableKey::Industry];
//!     let snapshot = load_snapshot(&provider, &keys, &SnapshotOptions::default()).await;
//!     println!("{} tables, {} skipped", snapshot.store.len(), snapshot.skipped.len());
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! [`HttpProvider::from_env`] reads these from the environment or a `.env` file:
//!
//! ```bash
//! RONDA_API_URL=https://data.example.com/v1
//! RONDA_API_TOKEN=your_token_here
//! ```

mod error;
mod http;
mod payload;
mod provider;
mod snapshot;

pub use error::DataError;
pub use http::{API_TOKEN_VAR, API_URL_VAR, HttpProvider};
pub use payload::TablePayload;
pub use provider::{JsonDirProvider, MemoryProvider, SnapshotProvider};
pub use snapshot::{Snapshot, SnapshotOptions, load_snapshot};

/// Result type for snapshot acquisition.
pub type Result<T> = std::result::Result<T, DataError>;
