//! The snapshot table store.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use ndarray::Array2;
use ronda_traits::{CategoryMap, Date, Frequency, Panel, Result, RondaError, Symbol, Table};

use crate::TableKey;

/// Named, frequency-tagged tables for one snapshot.
///
/// A store is filled once and then only read. Registration never replaces an
/// entry; a new snapshot means a fresh store. Reads hand out shared
/// references, so a store behind `&` can be read by any number of strategy
/// workers at once.
///
/// # Example
///
/// ```
/// use ronda_store::{TableKey, TableStore};
/// use ronda_traits::{Date, Frequency, Table};
///
/// let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
/// let close = Table::from_columns(
///     Frequency::Daily,
///     "TWD",
///     vec![d(2), d(3)],
///     vec![("2330".to_string(), vec![600.0, 610.0])],
/// )
/// .unwrap();
///
/// let mut store = TableStore::new();
/// store.register(TableKey::Close.name(), close).unwrap();
/// assert_eq!(store.get("price:close").unwrap().unit(), "TWD");
/// assert!(store.get("price:open").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: BTreeMap<String, Arc<Table>>,
    categories: BTreeMap<String, Arc<CategoryMap>>,
}

impl TableStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::DuplicateTable`] if `name` is already taken.
    pub fn register(&mut self, name: impl Into<String>, table: Table) -> Result<()> {
        let name = name.into();
        self.ensure_free(&name)?;
        tracing::debug!(
            table = %name,
            frequency = %table.frequency(),
            rows = table.n_rows(),
            symbols = table.n_cols(),
            "registered table"
        );
        self.tables.insert(name, Arc::new(table));
        Ok(())
    }

    /// Validate raw parts and register them as a table.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if the index is unsorted or repeats a
    /// timestamp, symbols repeat, or the payload is not rectangular with
    /// matching dimensions; [`RondaError::DuplicateTable`] if `name` is taken.
    pub fn register_matrix(
        &mut self,
        name: impl Into<String>,
        frequency: Frequency,
        unit: impl Into<String>,
        time_index: Vec<Date>,
        symbols: Vec<Symbol>,
        values: Array2<f64>,
    ) -> Result<()> {
        let table = Table::new(frequency, unit, time_index, symbols, values)?;
        self.register(name, table)
    }

    /// Register a symbol to category mapping under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::DuplicateTable`] if `name` is already taken.
    pub fn register_categories(&mut self, name: impl Into<String>, map: CategoryMap) -> Result<()> {
        let name = name.into();
        self.ensure_free(&name)?;
        tracing::debug!(table = %name, symbols = map.len(), "registered category map");
        self.categories.insert(name, Arc::new(map));
        Ok(())
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(RondaError::DuplicateTable(name.to_string()));
        }
        Ok(())
    }

    /// Look up a table by name.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::NotFound`] if no table is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| RondaError::NotFound(name.to_string()))
    }

    /// Shared handle to a table, for callers that outlive the borrow.
    pub fn get_shared(&self, name: &str) -> Option<Arc<Table>> {
        self.tables.get(name).cloned()
    }

    /// Look up a category mapping by name.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::NotFound`] if no mapping is registered under `name`.
    pub fn categories(&self, name: &str) -> Result<&CategoryMap> {
        self.categories
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| RondaError::NotFound(name.to_string()))
    }

    /// Look up a registry table.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::NotFound`] if the key is not loaded, or if it
    /// names a category mapping.
    pub fn table(&self, key: TableKey) -> Result<&Table> {
        self.get(key.name())
    }

    /// Whether anything (table or mapping) is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name) || self.categories.contains_key(name)
    }

    /// Whether the registry key is loaded in the form it requires.
    pub fn has_key(&self, key: TableKey) -> bool {
        if key.is_category() {
            self.categories.contains_key(key.name())
        } else {
            self.tables.contains_key(key.name())
        }
    }

    /// Registered names, tables and mappings, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tables
            .keys()
            .chain(self.categories.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.tables.len() + self.categories.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every symbol that appears in at least one numeric table.
    pub fn universe(&self) -> BTreeSet<Symbol> {
        self.tables
            .values()
            .flat_map(|table| table.symbols().iter().cloned())
            .collect()
    }

    /// Latest timestamp across the named tables; absent names are ignored.
    pub fn latest_date<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<Date> {
        names
            .into_iter()
            .filter_map(|name| self.tables.get(name))
            .filter_map(|table| table.last_date())
            .max()
    }
}
