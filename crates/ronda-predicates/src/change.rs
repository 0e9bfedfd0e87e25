//! Period-over-period change on a table's own index.

use std::fmt;

use ronda_traits::{Panel, Result, RondaError, Table};
use serde::{Deserialize, Serialize};

use crate::columns::map_columns;

/// How the current value is related to the value `k` rows back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// `current / previous`
    Ratio,
    /// `current / previous - 1`
    PctChange,
    /// `current - previous`
    Diff,
    /// `previous`
    Lag,
}

impl ChangeKind {
    /// Short name used in labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::PctChange => "pct_change",
            Self::Diff => "diff",
            Self::Lag => "lag",
        }
    }

    fn apply(self, current: f64, previous: f64) -> f64 {
        match self {
            Self::Lag => previous,
            Self::Diff => current - previous,
            _ if !current.is_finite() || previous == 0.0 => f64::NAN,
            Self::Ratio => current / previous,
            Self::PctChange => current / previous - 1.0,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relate each cell to the cell `k` rows earlier on the native index.
///
/// The first `k` rows are undefined, as is any cell whose current or
/// previous value is undefined. Ratios and percentage changes over a zero
/// base are undefined. `Lag` only needs the previous value.
///
/// With a monthly table, `change(revenue, PctChange, 12)` is year-over-year
/// growth and `k = 1` is month-over-month.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `k` is zero.
pub fn change(table: &Table, kind: ChangeKind, k: usize) -> Result<Table> {
    if k == 0 {
        return Err(RondaError::InvalidData(
            "change offset must be at least 1".to_string(),
        ));
    }
    let values = map_columns(table.values(), f64::NAN, |column, mut out| {
        for row in k..column.len() {
            let (current, previous) = (column[row], column[row - k]);
            if !previous.is_finite() || (kind != ChangeKind::Lag && !current.is_finite()) {
                continue;
            }
            let v = kind.apply(current, previous);
            out[row] = if v.is_finite() { v } else { f64::NAN };
        }
    });
    let unit = match kind {
        ChangeKind::Lag | ChangeKind::Diff => table.unit().to_string(),
        ChangeKind::Ratio | ChangeKind::PctChange => String::new(),
    };
    Table::new(
        table.frequency(),
        unit,
        table.time_index().to_vec(),
        table.symbols().to_vec(),
        values,
    )
}

/// `current / previous - 1` over `k` rows.
///
/// # Errors
///
/// See [`change`].
pub fn pct_change(table: &Table, k: usize) -> Result<Table> {
    change(table, ChangeKind::PctChange, k)
}

/// The value `k` rows earlier.
///
/// # Errors
///
/// See [`change`].
pub fn lag(table: &Table, k: usize) -> Result<Table> {
    change(table, ChangeKind::Lag, k)
}
