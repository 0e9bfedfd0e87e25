//! Wire format for one table of a snapshot.
//!
//! Every provider hands back a [`TablePayload`], tagged by `kind`:
//!
//! ```json
//! {
//!   "kind": "matrix",
//!   "frequency": "daily",
//!   "unit": "TWD",
//!   "time_index": ["2024-01-02", "2024-01-03"],
//!   "symbols": ["2330", "2317"],
//!   "values": [[593.0, 104.5], [null, 105.0]]
//! }
//! ```
//!
//! `events` payloads carry period-labelled records instead of a matrix, and
//! `categories` payloads a plain symbol to category mapping.

use ronda_store::{
    CategoryMap, TableKey, TableStore,
    events::{EventOptions, EventRecord, to_table},
};
use ronda_traits::{Date, Frequency, Panel, Symbol, Table};
use serde::{Deserialize, Serialize};

use crate::{DataError, Result};

/// One table as delivered by a [`SnapshotProvider`](crate::SnapshotProvider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TablePayload {
    /// A ready `time x symbol` matrix, row-major, `null` for undefined.
    Matrix {
        /// Native sampling cadence
        frequency: Frequency,
        /// Unit label
        #[serde(default)]
        unit: String,
        /// Strictly increasing timestamps, one per row
        time_index: Vec<Date>,
        /// Column symbols
        symbols: Vec<Symbol>,
        /// One row per timestamp, one value per symbol
        values: Vec<Vec<Option<f64>>>,
    },

    /// Period-labelled records to be converted into an event table.
    Events {
        /// Cadence hint from the source; the table is always `event`
        #[serde(default)]
        frequency: Option<Frequency>,
        /// Unit label
        #[serde(default)]
        unit: String,
        /// Raw records
        records: Vec<EventRecord>,
        /// Conversion options overriding the snapshot defaults for this table
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<EventOptions>,
    },

    /// Symbol to category mapping.
    Categories {
        /// Category per symbol
        categories: CategoryMap,
    },
}

impl TablePayload {
    /// Payload tag as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Matrix { .. } => "matrix",
            Self::Events { .. } => "events",
            Self::Categories { .. } => "categories",
        }
    }

    /// Build a matrix payload from a table.
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let values = table
            .values()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
            .collect();
        Self::Matrix {
            frequency: table.frequency(),
            unit: table.unit().to_string(),
            time_index: table.time_index().to_vec(),
            symbols: table.symbols().to_vec(),
            values,
        }
    }

    /// Convert a `matrix` or `events` payload into a table.
    ///
    /// `defaults` applies to `events` payloads that carry no options of
    /// their own.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Table`] if the matrix breaks a shape invariant,
    /// [`DataError::WrongKind`] for a `categories` payload.
    pub fn into_table(self, key: TableKey, defaults: &EventOptions) -> Result<Table> {
        match self {
            Self::Matrix {
                frequency,
                unit,
                time_index,
                symbols,
                values,
            } => {
                let rows = values
                    .into_iter()
                    .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
                    .collect();
                Ok(Table::from_rows(frequency, unit, time_index, symbols, rows)?)
            }
            Self::Events {
                frequency,
                unit,
                records,
                options,
            } => {
                if let Some(hint) = frequency.filter(|f| *f != Frequency::Event) {
                    tracing::debug!(table = %key, hint = %hint, "event payload converted to event frequency");
                }
                let options = options.as_ref().unwrap_or(defaults);
                Ok(to_table(&records, &unit, options)?)
            }
            Self::Categories { .. } => Err(DataError::WrongKind {
                key,
                found: "categories",
            }),
        }
    }

    /// Convert the payload and register it in `store` under `key`'s name.
    ///
    /// Category keys take `categories` payloads, every other key a `matrix`
    /// or `events` payload.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::WrongKind`] if the payload does not fit the key,
    /// [`DataError::Table`] if conversion or registration fails.
    pub fn register(self, store: &mut TableStore, key: TableKey, defaults: &EventOptions) -> Result<()> {
        match (key.is_category(), self) {
            (true, Self::Categories { categories }) => {
                store.register_categories(key.name(), categories)?;
            }
            (true, payload) => {
                return Err(DataError::WrongKind {
                    key,
                    found: payload.kind(),
                });
            }
            (false, payload) => {
                let table = payload.into_table(key, defaults)?;
                store.register(key.name(), table)?;
            }
        }
        Ok(())
    }
}
