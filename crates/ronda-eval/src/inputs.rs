//! Read access to the tables a strategy declared.

use ronda_store::{TableKey, TableStore};
use ronda_traits::{CategoryMap, Result, RondaError, Table};

/// The part of a snapshot a strategy is allowed to see.
///
/// Condition builders and scorers read tables through this view. Reading a
/// key the strategy did not declare is an error, which keeps the declared
/// table list honest: the evaluator checks exactly that list at load time.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    store: &'a TableStore,
    declared: &'a [TableKey],
}

impl<'a> Inputs<'a> {
    /// Restrict `store` to the `declared` keys.
    #[must_use]
    pub const fn new(store: &'a TableStore, declared: &'a [TableKey]) -> Self {
        Self { store, declared }
    }

    fn check(&self, key: TableKey) -> Result<()> {
        if self.declared.contains(&key) {
            Ok(())
        } else {
            Err(RondaError::InvalidData(format!(
                "{key} is read but not declared"
            )))
        }
    }

    /// A declared numeric table.
    ///
    /// # Errors
    ///
    /// [`RondaError::InvalidData`] if `key` is not declared,
    /// [`RondaError::NotFound`] if it is not loaded.
    pub fn table(&self, key: TableKey) -> Result<&'a Table> {
        self.check(key)?;
        self.store.table(key)
    }

    /// A declared category mapping.
    ///
    /// # Errors
    ///
    /// [`RondaError::InvalidData`] if `key` is not declared,
    /// [`RondaError::NotFound`] if it is not loaded.
    pub fn categories(&self, key: TableKey) -> Result<&'a CategoryMap> {
        self.check(key)?;
        self.store.categories(key.name())
    }

    /// The declared keys.
    #[must_use]
    pub const fn declared(&self) -> &'a [TableKey] {
        self.declared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::{Date, Frequency};

    #[test]
    fn test_undeclared_read_fails() {
        let d = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let mut store = TableStore::new();
        let close =
            Table::from_columns(Frequency::Daily, "TWD", vec![d], vec![("X".into(), vec![1.0])])
                .unwrap();
        store.register(TableKey::Close.name(), close).unwrap();

        let declared = [TableKey::Close, TableKey::Volume];
        let inputs = Inputs::new(&store, &declared);
        assert!(inputs.table(TableKey::Close).is_ok());
        assert!(inputs.table(TableKey::Volume).unwrap_err().is_not_found());
        assert!(matches!(
            inputs.table(TableKey::High),
            Err(RondaError::InvalidData(_))
        ));
    }
}
