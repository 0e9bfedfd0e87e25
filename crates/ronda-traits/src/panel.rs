//! The `Panel` trait: read access to a symbol by time matrix.
//!
//! Both [`Table`](crate::Table) and [`Condition`](crate::Condition) are panels.
//! The alignment engine and the predicate builders only ever read their
//! inputs through this trait, so the step-fill rule lives in one place.

use crate::{Date, Symbol};

/// Read-only access to a time-indexed, symbol-keyed matrix.
///
/// Rows follow [`time_index`](Panel::time_index), which is strictly
/// increasing; columns follow [`symbols`](Panel::symbols). A cell is `None`
/// when undefined.
pub trait Panel: Send + Sync {
    /// Cell value type (`f64` for tables, `bool` for conditions).
    type Value: Copy;

    /// Strictly increasing timestamps, one per row.
    fn time_index(&self) -> &[Date];

    /// Unique symbols, one per column.
    fn symbols(&self) -> &[Symbol];

    /// Value at (`row`, `col`), or `None` if undefined.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    fn cell(&self, row: usize, col: usize) -> Option<Self::Value>;

    /// Number of rows.
    fn n_rows(&self) -> usize {
        self.time_index().len()
    }

    /// Number of columns.
    fn n_cols(&self) -> usize {
        self.symbols().len()
    }

    /// Column position of `symbol`.
    fn column_of(&self, symbol: &str) -> Option<usize> {
        self.symbols().iter().position(|s| s == symbol)
    }

    /// Latest row whose timestamp is at or before `t`.
    ///
    /// This is the step-fill rule: an observation is visible from its own
    /// timestamp until superseded, and never before it.
    fn row_as_of(&self, t: Date) -> Option<usize> {
        self.time_index().partition_point(|d| *d <= t).checked_sub(1)
    }

    /// Effective value of `symbol` at `t` under step-fill.
    fn value_as_of(&self, symbol: &str, t: Date) -> Option<Self::Value> {
        let col = self.column_of(symbol)?;
        let row = self.row_as_of(t)?;
        self.cell(row, col)
    }

    /// Latest timestamp, if any.
    fn last_date(&self) -> Option<Date> {
        self.time_index().last().copied()
    }
}

impl<P: Panel + ?Sized> Panel for &P {
    type Value = P::Value;

    fn time_index(&self) -> &[Date] {
        (**self).time_index()
    }

    fn symbols(&self) -> &[Symbol] {
        (**self).symbols()
    }

    fn cell(&self, row: usize, col: usize) -> Option<Self::Value> {
        (**self).cell(row, col)
    }
}
