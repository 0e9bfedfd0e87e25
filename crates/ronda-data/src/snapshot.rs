//! Loading a whole snapshot into a [`TableStore`].

use std::collections::{BTreeMap, BTreeSet};

use ronda_store::{
    TableKey, TableStore,
    events::{EventOptions, Granularity, Reduce},
};
use serde::{Deserialize, Serialize};

use crate::SnapshotProvider;

/// Conversion options for a snapshot load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    /// Options for event payloads of tables not listed in `events`
    pub default_events: EventOptions,

    /// Per-table event options
    pub events: BTreeMap<TableKey, EventOptions>,
}

impl Default for SnapshotOptions {
    /// Cash dividends are summed per fiscal year; everything else keeps its
    /// labelled periods.
    fn default() -> Self {
        let dividend = EventOptions {
            reduce: Reduce::Sum,
            granularity: Granularity::Year,
            lag_days: 0,
        };
        Self {
            default_events: EventOptions::default(),
            events: BTreeMap::from([(TableKey::CashDividend, dividend)]),
        }
    }
}

impl SnapshotOptions {
    /// Event options that apply to `key`.
    #[must_use]
    pub fn event_options(&self, key: TableKey) -> &EventOptions {
        self.events.get(&key).unwrap_or(&self.default_events)
    }
}

/// The outcome of [`load_snapshot`].
#[derive(Debug, Default)]
pub struct Snapshot {
    /// Every table that was fetched and registered
    pub store: TableStore,

    /// Requested tables that could not be fetched or registered
    pub skipped: Vec<TableKey>,
}

impl Snapshot {
    /// Whether every requested table made it into the store.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Fetch every key from `provider` and register it in a fresh store.
///
/// Keys are fetched one at a time in registry order, each at most once. A key
/// that fails to fetch, convert or register is logged and listed in
/// [`Snapshot::skipped`]; strategies that need it then fail at their loading
/// stage instead of taking the whole batch down.
pub async fn load_snapshot(
    provider: &dyn SnapshotProvider,
    keys: &[TableKey],
    options: &SnapshotOptions,
) -> Snapshot {
    let keys: BTreeSet<TableKey> = keys.iter().copied().collect();
    let mut snapshot = Snapshot::default();

    for key in keys {
        let loaded = match provider.fetch(key).await {
            Ok(payload) => {
                payload.register(&mut snapshot.store, key, options.event_options(key))
            }
            Err(err) => Err(err),
        };
        if let Err(err) = loaded {
            tracing::warn!(provider = provider.name(), table = %key, error = %err, "skipping table");
            snapshot.skipped.push(key);
        }
    }

    tracing::info!(
        provider = provider.name(),
        tables = snapshot.store.len(),
        skipped = snapshot.skipped.len(),
        "loaded snapshot"
    );
    snapshot
}
